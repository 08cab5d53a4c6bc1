//! resoto-notebook: Tables and graphs from resoto graph searches.
//!
//! Queries a resoto core through a [`Client`], reshapes the JSON results
//! into a [`Table`] (one row per resource, with account/region/cloud ids
//! pulled from its ancestors) or a Graphviz [`Digraph`], and hands them to
//! the notebook or terminal for display.

pub mod error;
pub mod render;
pub mod shaping;
pub mod table;

pub use error::{NotebookError, Result};
pub use render::Digraph;
pub use table::Table;

use resoto_notebook_client::{connect, Client, Platform};
use resoto_notebook_core::{NotebookConfig, RenderConfig};

/// Entry point for notebook queries against one graph.
pub struct ResotoNotebook {
    client: Box<dyn Client>,
    graph: String,
}

impl ResotoNotebook {
    /// Connect to the resoto core at `url` and query `graph`.
    pub fn new(url: &str, psk: Option<&str>, graph: &str, platform: Platform) -> Result<Self> {
        let client = connect(url, psk, platform)?;
        Ok(Self::with_client(client, graph))
    }

    /// Connect to a local resoto core with default settings.
    pub fn with_psk(psk: Option<&str>) -> Result<Self> {
        let config = NotebookConfig {
            psk: psk.map(str::to_string),
            ..NotebookConfig::default()
        };
        Self::from_config(&config, Platform::detect())
    }

    pub fn from_config(config: &NotebookConfig, platform: Platform) -> Result<Self> {
        Self::new(&config.url, config.psk.as_deref(), &config.graph, platform)
    }

    /// Use an already constructed client.
    pub fn with_client(client: Box<dyn Client>, graph: &str) -> Self {
        Self {
            client,
            graph: graph.to_string(),
        }
    }

    /// Name of the graph this notebook queries.
    pub fn graph_name(&self) -> &str {
        &self.graph
    }

    /// Run a list search and tabulate the matching resources.
    ///
    /// Each row is a resource's `reported` section plus `account_id`,
    /// `region_id`, and `cloud_id`. If any result lacks a `reported`
    /// section, all results are deep-flattened into dotted columns instead.
    pub async fn search(&self, query: &str, section: Option<&str>) -> Result<Table> {
        let nodes = self.client.search_list(query, section, &self.graph).await?;
        let shaped = shaping::shape_nodes(nodes);
        tracing::info!(
            rows = shaped.table.len(),
            columns = shaped.table.columns().len(),
            normalized = shaped.normalized,
            "Search complete"
        );
        Ok(shaped.table)
    }

    /// Run a graph search and build a Graphviz digraph of the result.
    pub async fn graph(
        &self,
        query: &str,
        section: Option<&str>,
        config: &RenderConfig,
    ) -> Result<Digraph> {
        let elements = self.client.search_graph(query, section, &self.graph).await?;
        let digraph = render::build_digraph(query, &elements, config)?;
        tracing::info!(
            nodes = digraph.nodes().len(),
            edges = digraph.edges().len(),
            "Graph search complete"
        );
        Ok(digraph)
    }

    /// Execute a CLI command and tabulate its output.
    ///
    /// Resources are shaped like [`ResotoNotebook::search`]; plain values
    /// such as text lines land in the `value` column.
    pub async fn cli_execute(&self, query: &str, section: Option<&str>) -> Result<Table> {
        let values = self.client.cli_execute(query, &self.graph, section).await?;
        let shaped = shaping::shape(values);
        tracing::info!(
            rows = shaped.table.len(),
            columns = shaped.table.columns().len(),
            normalized = shaped.normalized,
            "CLI command complete"
        );
        Ok(shaped.table)
    }
}
