//! Configuration management for resoto notebooks.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (RESOTONOTEBOOK__ prefix, `__` separator)
//! 2. Config file (`resotonotebook.toml` by default), `[notebook]` section
//! 3. Defaults

use serde::Deserialize;

use crate::error::CoreError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "RESOTONOTEBOOK";

/// Connection and rendering settings for a notebook.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NotebookConfig {
    /// Base URL of the graph service.
    #[serde(default = "default_url")]
    pub url: String,

    /// Pre-shared key used to sign requests. No auth header when unset.
    #[serde(default)]
    pub psk: Option<String>,

    /// Name of the graph to query.
    #[serde(default = "default_graph")]
    pub graph: String,

    /// Property section the service should traverse.
    #[serde(default = "default_section")]
    pub section: String,

    #[serde(default)]
    pub render: RenderConfig,
}

/// Graphviz settings for graph rendering.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RenderConfig {
    /// Layout engine (default: force-directed `sfdp`).
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Output format (default: `svg`).
    #[serde(default = "default_format")]
    pub format: String,

    /// Orientation (default: left-to-right).
    #[serde(default = "default_rankdir")]
    pub rankdir: String,

    /// Edge style (default: curved splines).
    #[serde(default = "default_splines")]
    pub splines: String,

    #[serde(default = "default_overlap")]
    pub overlap: String,
}

fn default_url() -> String {
    "http://localhost:8900".to_string()
}

fn default_graph() -> String {
    "resoto".to_string()
}

fn default_section() -> String {
    "reported".to_string()
}

fn default_engine() -> String {
    "sfdp".to_string()
}

fn default_format() -> String {
    "svg".to_string()
}

fn default_rankdir() -> String {
    "LR".to_string()
}

fn default_splines() -> String {
    "true".to_string()
}

fn default_overlap() -> String {
    "false".to_string()
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            psk: None,
            graph: default_graph(),
            section: default_section(),
            render: RenderConfig::default(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            format: default_format(),
            rankdir: default_rankdir(),
            splines: default_splines(),
            overlap: default_overlap(),
        }
    }
}

impl NotebookConfig {
    /// Load from an optional config file and `RESOTONOTEBOOK__` env vars.
    pub fn load(file_prefix: &str) -> Result<Self, CoreError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Self::from_config(&cfg)
    }

    fn from_config(cfg: &config::Config) -> Result<Self, CoreError> {
        match cfg.get::<NotebookConfig>("notebook") {
            Ok(c) => Ok(c),
            Err(config::ConfigError::NotFound(_)) => {
                tracing::debug!("No [notebook] config section, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Result<NotebookConfig, CoreError> {
        let cfg = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        NotebookConfig::from_config(&cfg)
    }

    #[test]
    fn test_default_config() {
        let config = NotebookConfig::default();
        assert_eq!(config.url, "http://localhost:8900");
        assert_eq!(config.graph, "resoto");
        assert_eq!(config.section, "reported");
        assert!(config.psk.is_none());
        assert_eq!(config.render.engine, "sfdp");
        assert_eq!(config.render.format, "svg");
        assert_eq!(config.render.rankdir, "LR");
        assert_eq!(config.render.splines, "true");
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = from_toml(
            r#"
            [notebook]
            url = "https://resoto.example.com:8900"
            psk = "changeme"

            [notebook.render]
            engine = "dot"
            "#,
        )
        .unwrap();
        assert_eq!(config.url, "https://resoto.example.com:8900");
        assert_eq!(config.psk.as_deref(), Some("changeme"));
        assert_eq!(config.graph, "resoto");
        assert_eq!(config.render.engine, "dot");
        assert_eq!(config.render.format, "svg");
    }

    #[test]
    fn test_missing_section_is_default() {
        let config = from_toml("[other]\nkey = 1\n").unwrap();
        assert_eq!(config, NotebookConfig::default());
    }

    #[test]
    fn test_wrong_type_is_config_error() {
        let err = from_toml("[notebook]\nrender = 5\n").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
