//! Error types for the resoto-notebook crate.

use thiserror::Error;

use resoto_notebook_client::ClientError;
use resoto_notebook_core::CoreError;

#[derive(Error, Debug)]
pub enum NotebookError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Graphviz engine {engine} could not be started: {reason}")]
    EngineNotFound { engine: String, reason: String },

    #[error("Graphviz engine {engine} exited with code {code}: {stderr}")]
    Render {
        engine: String,
        code: i32,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NotebookError>;
