//! resoto-notebook-core: Shared types, configuration, and error handling for resoto notebooks.
//!
//! This crate provides the foundations used by the client and notebook crates:
//! - JSON path lookup over nested graph-node objects
//! - The resource kind taxonomy and per-render color assignment
//! - Configuration management
//! - Common error types

pub mod config;
pub mod error;
pub mod path;
pub mod types;

pub use config::{NotebookConfig, RenderConfig};
pub use error::CoreError;
pub use path::{js_find, js_get};
pub use types::{ColorTable, JsObject, ResourceDescription, ResourceKind};
