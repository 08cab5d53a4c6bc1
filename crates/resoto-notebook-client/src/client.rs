//! The query client contract and transport selection.

use async_trait::async_trait;
use serde_json::Value;

use resoto_notebook_core::JsObject;

use crate::error::Result;
use crate::native::NativeClient;

/// Queries against the resoto graph search API.
///
/// `search` is a query in the service's search language and is passed
/// through untouched. `section` selects the property subtree the service
/// traverses (usually `reported`); `graph` names the graph.
///
/// Every call is one request/response round trip. Failures are returned
/// as-is, nothing is retried or cached. Futures are not `Send`: notebook
/// runtimes are single threaded and the browser fetch primitive is too.
#[async_trait(?Send)]
pub trait Client {
    /// Search and return matching nodes as a flat list.
    async fn search_list(
        &self,
        search: &str,
        section: Option<&str>,
        graph: &str,
    ) -> Result<Vec<JsObject>>;

    /// Search and return matching nodes and the edges between them.
    ///
    /// Elements carry `"type": "node"` or `"type": "edge"`.
    async fn search_graph(
        &self,
        search: &str,
        section: Option<&str>,
        graph: &str,
    ) -> Result<Vec<JsObject>>;

    /// Execute a CLI command and return its output values.
    async fn cli_execute(&self, query: &str, graph: &str, section: Option<&str>)
        -> Result<Vec<Value>>;
}

/// Which transport a client uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Direct HTTP from a conventional process.
    Native,
    /// The host browser's fetch primitive, for notebooks running in a sandbox.
    Sandboxed,
}

impl Platform {
    /// `Sandboxed` when compiled for `wasm32`, `Native` otherwise.
    pub fn detect() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::Sandboxed
        } else {
            Self::Native
        }
    }
}

/// A fresh per-client session id, sent with every request as a hint to the
/// service.
pub(crate) fn new_session_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Build a client for `platform`.
///
/// The sandboxed transport sends requests to the origin of the page hosting
/// the notebook, so `url` only applies to the native transport.
pub fn connect(url: &str, psk: Option<&str>, platform: Platform) -> Result<Box<dyn Client>> {
    match platform {
        Platform::Native => Ok(Box::new(NativeClient::new(url, psk)?)),
        Platform::Sandboxed => sandboxed_client(url, psk),
    }
}

#[cfg(target_arch = "wasm32")]
fn sandboxed_client(url: &str, psk: Option<&str>) -> Result<Box<dyn Client>> {
    use crate::sandboxed::SandboxedClient;
    use crate::web::WebFetch;

    let fetch = WebFetch::new()?;
    let origin = fetch.origin()?;
    tracing::debug!(requested = %url, origin = %origin, "Sandboxed client uses page origin");
    Ok(Box::new(SandboxedClient::new(origin, psk, fetch)))
}

#[cfg(not(target_arch = "wasm32"))]
fn sandboxed_client(_url: &str, _psk: Option<&str>) -> Result<Box<dyn Client>> {
    Err(crate::error::ClientError::UnsupportedPlatform(
        "the sandboxed client needs a browser fetch primitive (build for wasm32)".to_string(),
    ))
}
