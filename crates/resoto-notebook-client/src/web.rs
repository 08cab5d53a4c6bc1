//! [`Fetch`] backed by the browser's `window.fetch`.

use async_trait::async_trait;
use url::Url;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response, Window};

use crate::error::{ClientError, Result};
use crate::sandboxed::{Fetch, FetchRequest, FetchResponse};

fn js_error(context: &str, e: JsValue) -> ClientError {
    let message = e
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| e.as_string())
        .unwrap_or_else(|| format!("{e:?}"));
    ClientError::Fetch(format!("{context}: {message}"))
}

/// Fetch through the window the notebook runs in.
pub struct WebFetch {
    window: Window,
}

impl WebFetch {
    pub fn new() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| ClientError::UnsupportedPlatform("no global window".to_string()))?;
        Ok(Self { window })
    }

    /// Origin of the page hosting the notebook.
    pub fn origin(&self) -> Result<Url> {
        let origin = self
            .window
            .location()
            .origin()
            .map_err(|e| js_error("location.origin", e))?;
        Ok(Url::parse(&origin)?)
    }
}

#[async_trait(?Send)]
impl Fetch for WebFetch {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        let headers = Headers::new().map_err(|e| js_error("Headers", e))?;
        for (name, value) in &request.headers {
            headers
                .set(name, value)
                .map_err(|e| js_error("Headers.set", e))?;
        }

        let init = RequestInit::new();
        init.set_method(request.method);
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(&request.body));

        let js_request = Request::new_with_str_and_init(request.url.as_str(), &init)
            .map_err(|e| js_error("Request", e))?;
        let value = JsFuture::from(self.window.fetch_with_request(&js_request))
            .await
            .map_err(|e| js_error("fetch", e))?;
        let response: Response = value
            .dyn_into()
            .map_err(|e| js_error("fetch returned a non-Response", e))?;

        let content_type = response
            .headers()
            .get("Content-Type")
            .map_err(|e| js_error("Headers.get", e))?;
        let text = response.text().map_err(|e| js_error("Response.text", e))?;
        let body = JsFuture::from(text)
            .await
            .map_err(|e| js_error("Response.text", e))?
            .as_string()
            .unwrap_or_default();

        Ok(FetchResponse {
            status: response.status(),
            content_type,
            body,
        })
    }
}
