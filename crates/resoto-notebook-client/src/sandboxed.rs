//! Transport for notebooks running inside a browser sandbox.
//!
//! Requests go through the host's fetch primitive, abstracted as [`Fetch`]
//! so the request building and response decoding can run anywhere. The
//! browser implementation lives in [`crate::web`].

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use resoto_notebook_core::JsObject;

use crate::auth;
use crate::client::{new_session_id, Client};
use crate::decode::{self, APPLICATION_JSON, TEXT_PLAIN};
use crate::endpoint::Endpoint;
use crate::error::{ClientError, Result};

/// A request handed to the host fetch primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: &'static str,
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl FetchRequest {
    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What the host fetch primitive returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    /// The declared `Content-Type` header, if any.
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The host's fetch primitive.
#[async_trait(?Send)]
pub trait Fetch {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse>;
}

/// A [`Client`] that issues every request through a [`Fetch`].
pub struct SandboxedClient<F> {
    origin: Url,
    psk: Option<String>,
    session_id: String,
    fetch: F,
}

impl<F: Fetch> SandboxedClient<F> {
    /// `origin` is the scheme/host/port requests are sent to.
    pub fn new(origin: Url, psk: Option<&str>, fetch: F) -> Self {
        Self {
            origin,
            psk: psk.map(str::to_string),
            session_id: new_session_id(),
            fetch,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn fetcher(&self) -> &F {
        &self.fetch
    }

    async fn call(
        &self,
        endpoint: Endpoint<'_>,
        section: Option<&str>,
        body: &str,
        content_type: &str,
    ) -> Result<FetchResponse> {
        let request = FetchRequest {
            method: "POST",
            url: endpoint.url(&self.origin, section, &self.session_id)?,
            headers: auth::request_headers(self.psk.as_deref(), content_type)?,
            body: body.to_string(),
        };
        tracing::debug!(
            path = %endpoint.path(),
            section = ?section,
            session_id = %self.session_id,
            "Sending fetch request"
        );

        let response = self.fetch.fetch(request).await?;
        if !response.is_success() {
            tracing::warn!(path = %endpoint.path(), status = response.status, "Request failed");
            return Err(ClientError::Status {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }
}

#[async_trait(?Send)]
impl<F: Fetch> Client for SandboxedClient<F> {
    async fn search_list(
        &self,
        search: &str,
        section: Option<&str>,
        graph: &str,
    ) -> Result<Vec<JsObject>> {
        let response = self
            .call(Endpoint::SearchList { graph }, section, search, APPLICATION_JSON)
            .await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn search_graph(
        &self,
        search: &str,
        section: Option<&str>,
        graph: &str,
    ) -> Result<Vec<JsObject>> {
        let response = self
            .call(Endpoint::SearchGraph { graph }, section, search, APPLICATION_JSON)
            .await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn cli_execute(
        &self,
        query: &str,
        graph: &str,
        section: Option<&str>,
    ) -> Result<Vec<Value>> {
        let response = self
            .call(Endpoint::CliExecute { graph }, section, query, TEXT_PLAIN)
            .await?;
        decode::cli_sandboxed(response.content_type.as_deref(), response.body)
    }
}
