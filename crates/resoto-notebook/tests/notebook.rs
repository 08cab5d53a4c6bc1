//! End-to-end tests for the notebook facade over an in-memory client.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{json, Value};

use resoto_notebook::{NotebookError, ResotoNotebook};
use resoto_notebook_client::{Client, ClientError, Result};
use resoto_notebook_core::{CoreError, JsObject, RenderConfig};

/// Answers every call with fixed data and records the arguments it saw.
#[derive(Default)]
struct StaticClient {
    list: Vec<JsObject>,
    graph: Vec<JsObject>,
    cli: Vec<Value>,
    fail_with: Option<String>,
    calls: Rc<RefCell<Vec<String>>>,
}

impl StaticClient {
    fn check(&self, call: String) -> Result<()> {
        self.calls.borrow_mut().push(call);
        match &self.fail_with {
            Some(body) => Err(ClientError::Status {
                status: 500,
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl Client for StaticClient {
    async fn search_list(
        &self,
        search: &str,
        section: Option<&str>,
        graph: &str,
    ) -> Result<Vec<JsObject>> {
        self.check(format!("list {search} {section:?} {graph}"))?;
        Ok(self.list.clone())
    }

    async fn search_graph(
        &self,
        search: &str,
        section: Option<&str>,
        graph: &str,
    ) -> Result<Vec<JsObject>> {
        self.check(format!("graph {search} {section:?} {graph}"))?;
        Ok(self.graph.clone())
    }

    async fn cli_execute(
        &self,
        query: &str,
        graph: &str,
        section: Option<&str>,
    ) -> Result<Vec<Value>> {
        self.check(format!("cli {query} {section:?} {graph}"))?;
        Ok(self.cli.clone())
    }
}

fn obj(v: Value) -> JsObject {
    v.as_object().cloned().unwrap()
}

fn notebook(client: StaticClient) -> ResotoNotebook {
    ResotoNotebook::with_client(Box::new(client), "resoto")
}

#[tokio::test]
async fn test_search_shapes_resources() {
    let client = StaticClient {
        list: vec![obj(json!({
            "id": "uid-1",
            "reported": {"id": "i-1", "kind": "digitalocean_droplet", "name": "web"},
            "ancestors": {"account": {"reported": {"id": "acct-9"}}},
        }))],
        ..StaticClient::default()
    };
    let table = notebook(client)
        .search("is(digitalocean_droplet)", Some("reported"))
        .await
        .unwrap();

    assert_eq!(
        table.columns(),
        ["id", "kind", "name", "account_id", "region_id", "cloud_id"]
    );
    assert_eq!(
        Value::Object(table.to_records()[0].clone()),
        json!({
            "id": "i-1",
            "kind": "digitalocean_droplet",
            "name": "web",
            "account_id": "acct-9",
            "region_id": null,
            "cloud_id": null,
        })
    );
}

#[tokio::test]
async fn test_search_passes_arguments() {
    let client = StaticClient::default();
    let calls = Rc::clone(&client.calls);
    let notebook = ResotoNotebook::with_client(Box::new(client), "staging");
    notebook.search("all", None).await.unwrap();
    let table = notebook.search("is(volume)", Some("desired")).await.unwrap();
    notebook.cli_execute("echo hi", Some("reported")).await.unwrap();

    assert!(table.is_empty());
    assert_eq!(
        *calls.borrow(),
        vec![
            "list all None staging".to_string(),
            "list is(volume) Some(\"desired\") staging".to_string(),
            "cli echo hi Some(\"reported\") staging".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_search_mixed_shapes_flattens_everything() {
    let client = StaticClient {
        list: vec![
            obj(json!({"id": "uid-1", "reported": {"id": "i-1"}})),
            obj(json!({"id": "uid-2", "metadata": {"python_type": "x"}})),
        ],
        ..StaticClient::default()
    };
    let table = notebook(client).search("all", None).await.unwrap();
    assert_eq!(table.columns(), ["id", "reported.id", "metadata.python_type"]);
    assert_eq!(table.get(0, "reported.id"), Some(&json!("i-1")));
    assert_eq!(table.get(1, "metadata.python_type"), Some(&json!("x")));
}

#[tokio::test]
async fn test_cli_execute_text_output() {
    let client = StaticClient {
        cli: vec![json!("done")],
        ..StaticClient::default()
    };
    let table = notebook(client)
        .cli_execute("echo done", Some("reported"))
        .await
        .unwrap();
    assert_eq!(table.columns(), ["value"]);
    assert_eq!(table.column("value").unwrap(), vec![&json!("done")]);
}

#[tokio::test]
async fn test_cli_execute_without_reported_is_normalized() {
    let client = StaticClient {
        cli: vec![
            json!({"kind": "digitalocean_droplet", "count": {"total": 3}}),
            json!({"kind": "digitalocean_volume", "count": {"total": 1}}),
        ],
        ..StaticClient::default()
    };
    let table = notebook(client)
        .cli_execute("search all | count kind", None)
        .await
        .unwrap();
    assert_eq!(table.columns(), ["kind", "count.total"]);
    assert_eq!(table.get(1, "count.total"), Some(&json!(1)));
}

#[tokio::test]
async fn test_graph_renders_nodes_and_edges() {
    let client = StaticClient {
        graph: vec![
            obj(json!({
                "type": "node", "id": "u1",
                "reported": {"id": "d-1", "kind": "digitalocean_droplet", "name": "web"},
            })),
            obj(json!({
                "type": "node", "id": "u2",
                "reported": {"id": "v-1", "kind": "digitalocean_volume", "name": "data"},
            })),
            obj(json!({"type": "edge", "from": "u1", "to": "u2"})),
        ],
        ..StaticClient::default()
    };
    let digraph = notebook(client)
        .graph("is(digitalocean_droplet) -->", Some("reported"), &RenderConfig::default())
        .await
        .unwrap();

    assert_eq!(digraph.comment, "is(digitalocean_droplet) -->");
    assert_eq!(digraph.nodes().len(), 2);
    assert_eq!(digraph.edges().len(), 1);

    let source = digraph.source();
    assert!(source.starts_with("// is(digitalocean_droplet) -->\ndigraph {\n"));
    assert!(source.contains("\tu1 -> u2\n"));
    assert!(source.contains(r#"COLOR="2""#));
}

#[tokio::test]
async fn test_graph_missing_kind_fails() {
    let client = StaticClient {
        graph: vec![obj(json!({"type": "node", "id": "u1", "reported": {"id": "d-1", "name": "web"}}))],
        ..StaticClient::default()
    };
    let err = notebook(client)
        .graph("all", None, &RenderConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, NotebookError::Core(CoreError::PathNotFound { .. })));
}

#[tokio::test]
async fn test_transport_failure_message_is_body() {
    for op in ["search", "graph", "cli"] {
        let client = StaticClient {
            fail_with: Some("boom".to_string()),
            ..StaticClient::default()
        };
        let nb = notebook(client);
        let err = match op {
            "search" => nb.search("all", None).await.err().unwrap(),
            "graph" => nb
                .graph("all", None, &RenderConfig::default())
                .await
                .err()
                .unwrap(),
            _ => nb.cli_execute("all", None).await.err().unwrap(),
        };
        assert_eq!(err.to_string(), "boom");
        assert!(matches!(err, NotebookError::Client(ClientError::Status { .. })));
    }
}
