//! Direct HTTP transport built on `reqwest`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use url::Url;

use resoto_notebook_core::JsObject;

use crate::auth;
use crate::client::{new_session_id, Client};
use crate::decode::{self, APPLICATION_JSON, TEXT_PLAIN};
use crate::endpoint::Endpoint;
use crate::error::{ClientError, Result};

/// Talks to the graph service over HTTP from a conventional process.
///
/// Clone is cheap (the inner `reqwest::Client` is reference counted).
#[derive(Clone)]
pub struct NativeClient {
    http: reqwest::Client,
    base_url: Url,
    psk: Option<String>,
    session_id: String,
}

impl NativeClient {
    pub fn new(url: &str, psk: Option<&str>) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Self::with_http(http, url, psk)
    }

    /// Use a preconfigured `reqwest::Client` (proxy, TLS, timeouts).
    pub fn with_http(http: reqwest::Client, url: &str, psk: Option<&str>) -> Result<Self> {
        let base_url = Url::parse(url)?;
        Ok(Self {
            http,
            base_url,
            psk: psk.map(str::to_string),
            session_id: new_session_id(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// POST `body` and return the response content type and text.
    ///
    /// A non-success status is an error carrying the response body.
    async fn post(
        &self,
        endpoint: Endpoint<'_>,
        section: Option<&str>,
        body: &str,
        content_type: &str,
    ) -> Result<(Option<String>, String)> {
        let url = endpoint.url(&self.base_url, section, &self.session_id)?;
        tracing::debug!(
            path = %endpoint.path(),
            section = ?section,
            session_id = %self.session_id,
            "Sending request"
        );

        let mut request = self.http.post(url).body(body.to_string());
        for (name, value) in auth::request_headers(self.psk.as_deref(), content_type)? {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status();
        let response_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(path = %endpoint.path(), status = status.as_u16(), "Request failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok((response_type, text))
    }
}

#[async_trait(?Send)]
impl Client for NativeClient {
    async fn search_list(
        &self,
        search: &str,
        section: Option<&str>,
        graph: &str,
    ) -> Result<Vec<JsObject>> {
        let (content_type, body) = self
            .post(Endpoint::SearchList { graph }, section, search, APPLICATION_JSON)
            .await?;
        decode::search_results(content_type.as_deref(), &body)
    }

    async fn search_graph(
        &self,
        search: &str,
        section: Option<&str>,
        graph: &str,
    ) -> Result<Vec<JsObject>> {
        let (content_type, body) = self
            .post(Endpoint::SearchGraph { graph }, section, search, APPLICATION_JSON)
            .await?;
        decode::search_results(content_type.as_deref(), &body)
    }

    async fn cli_execute(
        &self,
        query: &str,
        graph: &str,
        section: Option<&str>,
    ) -> Result<Vec<Value>> {
        let (content_type, body) = self
            .post(Endpoint::CliExecute { graph }, section, query, TEXT_PLAIN)
            .await?;
        decode::cli_native(content_type.as_deref(), &body)
    }
}
