use thiserror::Error;

/// Errors shared by every resoto notebook crate.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Path {path} not found in {node}")]
    PathNotFound { path: String, node: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for CoreError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
