//! CLI entry point for resoto-notebook.
//!
//! Runs one query against a resoto core and writes the result to stdout:
//! an aligned table (or JSON records) for searches and CLI commands, DOT
//! source or a rendered file for graph searches. Logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use resoto_notebook::{ResotoNotebook, Table};
use resoto_notebook_client::Platform;
use resoto_notebook_core::NotebookConfig;

#[derive(Parser)]
#[command(name = "resoto-notebook")]
#[command(about = "Query a resoto graph and print tables or Graphviz graphs")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: resotonotebook).
    #[arg(short, long, default_value = "resotonotebook", global = true)]
    config: String,

    /// Override the resoto core URL.
    #[arg(long, global = true)]
    url: Option<String>,

    /// Override the pre-shared key.
    #[arg(long, global = true)]
    psk: Option<String>,

    /// Override the graph name.
    #[arg(long, global = true)]
    graph: Option<String>,

    /// Override the property section (empty for none).
    #[arg(long, global = true)]
    section: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run a list search and print a table.
    Search {
        /// Search query.
        query: String,
        /// Print JSON records instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Execute a CLI command and print a table.
    Cli {
        /// Command line to execute.
        #[arg(value_name = "COMMAND")]
        line: String,
        /// Print JSON records instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Run a graph search and print DOT source or render it to a file.
    Graph {
        /// Search query.
        query: String,
        /// Graphviz layout engine (overrides config).
        #[arg(long)]
        engine: Option<String>,
        /// Graphviz output format (overrides config).
        #[arg(long)]
        format: Option<String>,
        /// Render with Graphviz into this file instead of printing DOT.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if cli.log_json {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    }

    let config = resolve_config(&cli)?;
    let notebook = ResotoNotebook::from_config(&config, Platform::Native)?;
    let section = Some(config.section.as_str()).filter(|s| !s.is_empty());

    match cli.command {
        Command::Search { ref query, json } => {
            let table = notebook.search(query, section).await?;
            print_table(&table, json)?;
        }
        Command::Cli { ref line, json } => {
            let table = notebook.cli_execute(line, section).await?;
            print_table(&table, json)?;
        }
        Command::Graph {
            ref query,
            ref engine,
            ref format,
            ref output,
        } => {
            let mut render = config.render.clone();
            if let Some(engine) = engine {
                render.engine = engine.clone();
            }
            if let Some(format) = format {
                render.format = format.clone();
            }

            let digraph = notebook.graph(query, section, &render).await?;
            match output {
                Some(path) => {
                    let bytes = digraph.render().await?;
                    tokio::fs::write(path, bytes).await?;
                    tracing::info!(path = %path.display(), "Wrote graph");
                }
                None => print!("{}", digraph.source()),
            }
        }
    }

    Ok(())
}

/// Config file and env vars, then command-line overrides.
fn resolve_config(cli: &Cli) -> anyhow::Result<NotebookConfig> {
    let mut config = NotebookConfig::load(&cli.config)?;
    if let Some(url) = &cli.url {
        config.url = url.clone();
    }
    if let Some(psk) = &cli.psk {
        config.psk = Some(psk.clone());
    }
    if let Some(graph) = &cli.graph {
        config.graph = graph.clone();
    }
    if let Some(section) = &cli.section {
        config.section = section.clone();
    }
    Ok(config)
}

fn print_table(table: &Table, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&table.to_records())?);
    } else {
        print!("{table}");
    }
    Ok(())
}
