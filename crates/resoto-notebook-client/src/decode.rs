//! Response body decoding by declared content type.

use serde::de::DeserializeOwned;
use serde_json::Value;

use resoto_notebook_core::JsObject;

use crate::error::{ClientError, Result};

pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_NDJSON: &str = "application/x-ndjson";

/// Media type of a `Content-Type` header value, without parameters.
///
/// `"Text/Plain; charset=utf-8"` becomes `"text/plain"`.
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn display_content_type(content_type: Option<&str>) -> String {
    content_type.unwrap_or("(none)").to_string()
}

/// Parse a JSON body, wrapping anything but an array in a one-element vec.
pub fn json_collection(body: &str) -> Result<Vec<Value>> {
    match serde_json::from_str(body)? {
        Value::Array(items) => Ok(items),
        other => Ok(vec![other]),
    }
}

/// Parse newline-delimited JSON, skipping blank lines.
pub fn ndjson<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(ClientError::from))
        .collect()
}

/// Decode a list or graph search response into node/edge objects.
///
/// The service answers with a JSON array, or NDJSON when streaming.
pub fn search_results(content_type: Option<&str>, body: &str) -> Result<Vec<JsObject>> {
    match content_type.map(media_type).as_deref() {
        Some(APPLICATION_NDJSON) => ndjson(body),
        _ => Ok(serde_json::from_str(body)?),
    }
}

/// Decode a CLI response the way the native client does.
///
/// Plain text yields one string per line.
pub fn cli_native(content_type: Option<&str>, body: &str) -> Result<Vec<Value>> {
    match content_type.map(media_type).as_deref() {
        Some(TEXT_PLAIN) => Ok(body.lines().map(|l| Value::String(l.to_string())).collect()),
        Some(APPLICATION_JSON) => json_collection(body),
        Some(APPLICATION_NDJSON) => ndjson(body),
        _ => Err(ClientError::UnexpectedContentType {
            content_type: display_content_type(content_type),
        }),
    }
}

/// Decode a CLI response the way the sandboxed client does.
///
/// Plain text yields the whole body as a single string. Only text and JSON
/// are understood; anything else is `UnsupportedContentType`.
pub fn cli_sandboxed(content_type: Option<&str>, body: String) -> Result<Vec<Value>> {
    match content_type.map(media_type).as_deref() {
        Some(TEXT_PLAIN) => Ok(vec![Value::String(body)]),
        Some(APPLICATION_JSON) => json_collection(&body),
        _ => Err(ClientError::UnsupportedContentType {
            content_type: display_content_type(content_type),
        }),
    }
}
