//! Graphviz rendering of graph search results.

use serde_json::Value;

use resoto_notebook_core::{
    js_get, ColorTable, CoreError, JsObject, RenderConfig, ResourceDescription, ResourceKind,
};

/// A node in the rendered graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotNode {
    pub name: String,
    /// Graphviz HTML-like label, including the outer `<` `>`.
    pub label: String,
    pub shape: String,
}

/// A directed edge between two node names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotEdge {
    pub tail: String,
    pub head: String,
}

/// A directed graph plus the settings needed to lay it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digraph {
    /// Written as a `//` comment above the graph; the query for search graphs.
    pub comment: String,
    /// Graphviz layout engine binary, e.g. `sfdp` or `dot`.
    pub engine: String,
    /// Graphviz output format, e.g. `svg`.
    pub format: String,
    pub graph_attr: Vec<(String, String)>,
    pub node_attr: Vec<(String, String)>,
    nodes: Vec<DotNode>,
    edges: Vec<DotEdge>,
}

impl Digraph {
    pub fn new(comment: &str, config: &RenderConfig) -> Self {
        Self {
            comment: comment.to_string(),
            engine: config.engine.clone(),
            format: config.format.clone(),
            graph_attr: vec![
                ("rankdir".to_string(), config.rankdir.clone()),
                ("splines".to_string(), config.splines.clone()),
                ("overlap".to_string(), config.overlap.clone()),
            ],
            node_attr: vec![
                ("shape".to_string(), "plain".to_string()),
                ("colorscheme".to_string(), "paired12".to_string()),
            ],
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn node(&mut self, name: &str, label: String) {
        self.nodes.push(DotNode {
            name: name.to_string(),
            label,
            shape: "plain".to_string(),
        });
    }

    pub fn edge(&mut self, tail: &str, head: &str) {
        self.edges.push(DotEdge {
            tail: tail.to_string(),
            head: head.to_string(),
        });
    }

    pub fn nodes(&self) -> &[DotNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[DotEdge] {
        &self.edges
    }

    /// The graph in DOT language.
    pub fn source(&self) -> String {
        let mut out = String::new();
        for line in self.comment.lines() {
            out.push_str(&format!("// {line}\n"));
        }
        out.push_str("digraph {\n");
        if !self.graph_attr.is_empty() {
            out.push_str(&format!("\tgraph [{}]\n", attr_list(&self.graph_attr)));
        }
        if !self.node_attr.is_empty() {
            out.push_str(&format!("\tnode [{}]\n", attr_list(&self.node_attr)));
        }
        for node in &self.nodes {
            out.push_str(&format!(
                "\t{} [label={} shape={}]\n",
                quote_id(&node.name),
                node.label,
                quote_id(&node.shape)
            ));
        }
        for edge in &self.edges {
            out.push_str(&format!(
                "\t{} -> {}\n",
                quote_id(&edge.tail),
                quote_id(&edge.head)
            ));
        }
        out.push_str("}\n");
        out
    }
}

impl std::fmt::Display for Digraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source())
    }
}

fn attr_list(attrs: &[(String, String)]) -> String {
    attrs
        .iter()
        .map(|(k, v)| format!("{}={}", quote_id(k), quote_id(v)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// DOT keywords, matched case-insensitively; never valid as bare ids.
const DOT_KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// A DOT identifier: bare when it is a plain name or number, quoted otherwise.
fn quote_id(id: &str) -> String {
    let is_name = id
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !DOT_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(id));
    let is_number = id.parse::<f64>().is_ok()
        && id.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-');
    if is_name || is_number {
        id.to_string()
    } else {
        format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

/// Escape text for a Graphviz HTML-like label.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// A rounded panel showing kind, id, and name, bordered in `color`.
pub fn render_resource(resource: &ResourceDescription, color: u8) -> String {
    format!(
        r#"<<TABLE STYLE="ROUNDED" COLOR="{color}" BORDER="3" CELLBORDER="1" CELLPADDING="5">
    <TR>
        <TD SIDES="B">{kind}</TD>
    </TR>
    <TR>
        <TD SIDES="B">{id}</TD>
    </TR>
    <TR>
        <TD BORDER="0">{name}</TD>
    </TR>
</TABLE>>"#,
        kind = escape_html(&resource.kind_name),
        id = escape_html(&resource.id),
        name = escape_html(&resource.name),
    )
}

/// Describe a `"type": "node"` element.
pub fn describe_node(elem: &JsObject) -> Result<ResourceDescription, CoreError> {
    let kind_name = js_get(elem, &["reported", "kind"])?;
    Ok(ResourceDescription {
        uid: js_get(elem, &["id"])?.to_string(),
        id: js_get(elem, &["reported", "id"])?.to_string(),
        name: js_get(elem, &["reported", "name"])?.to_string(),
        kind: ResourceKind::parse_kind(kind_name),
        kind_name: kind_name.to_string(),
    })
}

fn add_element(
    digraph: &mut Digraph,
    colors: &mut ColorTable,
    elem: &JsObject,
) -> Result<(), CoreError> {
    match elem.get("type").and_then(Value::as_str) {
        Some("node") => {
            let resource = describe_node(elem)?;
            let color = colors.slot(&resource.kind_name);
            digraph.node(&resource.uid, render_resource(&resource, color));
        }
        Some("edge") => {
            digraph.edge(js_get(elem, &["from"])?, js_get(elem, &["to"])?);
        }
        _ => {}
    }
    Ok(())
}

/// Build a digraph from graph search elements, in order.
///
/// Nodes are colored per distinct kind; colors are assigned fresh for each
/// call. Elements that are neither nodes nor edges are skipped. A node or
/// edge missing a required field aborts the whole build.
pub fn build_digraph(
    query: &str,
    elements: &[JsObject],
    config: &RenderConfig,
) -> Result<Digraph, CoreError> {
    let mut digraph = Digraph::new(query, config);
    let mut colors = ColorTable::new();
    for elem in elements {
        add_element(&mut digraph, &mut colors, elem)?;
    }
    tracing::debug!(
        nodes = digraph.nodes().len(),
        edges = digraph.edges().len(),
        kinds = colors.len(),
        "Built digraph"
    );
    Ok(digraph)
}

#[cfg(not(target_arch = "wasm32"))]
mod engine {
    use std::process::Stdio;

    use tokio::io::AsyncWriteExt;
    use tokio::process::Command;

    use super::Digraph;
    use crate::error::{NotebookError, Result};

    impl Digraph {
        /// Lay out and render through the Graphviz engine binary.
        ///
        /// Runs `<engine> -T<format>` with the DOT source on stdin and
        /// returns its stdout.
        pub async fn render(&self) -> Result<Vec<u8>> {
            let mut child = Command::new(&self.engine)
                .arg(format!("-T{}", self.format))
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()
                .map_err(|e| NotebookError::EngineNotFound {
                    engine: self.engine.clone(),
                    reason: e.to_string(),
                })?;

            // Feed stdin while collecting output; the engine may exit early.
            let source = self.source();
            let stdin = child.stdin.take();
            let write = async move {
                match stdin {
                    Some(mut stdin) => stdin.write_all(source.as_bytes()).await,
                    None => Ok(()),
                }
            };
            let (written, output) = tokio::join!(write, child.wait_with_output());

            let output = output?;
            if !output.status.success() {
                return Err(NotebookError::Render {
                    engine: self.engine.clone(),
                    code: output.status.code().unwrap_or(-1),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                });
            }
            if let Err(e) = written {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }

            tracing::info!(
                engine = %self.engine,
                format = %self.format,
                bytes = output.stdout.len(),
                "Rendered graph"
            );
            Ok(output.stdout)
        }
    }
}
