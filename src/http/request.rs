//! Request body parsing and request identification.
//!
//! # Responsibilities
//! - Read the request id set by the request-id layer
//! - Parse bodies as JSON objects or URL-encoded forms
//!
//! # Design Decisions
//! - An empty body is an empty object, not an error
//! - Form fields arrive as strings; JSON keeps its types
//! - Repeated form keys, `name[]` and `name[0]` collect into arrays
//! - Only objects are accepted at the top level

use axum::body::Bytes;
use axum::extract::{Form, FromRequest, Request};
use axum::http::{header, HeaderMap, StatusCode};
use serde_json::{Map, Value};

use crate::crud::error::ApiError;

/// Header carrying the per-request id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request id from `headers`, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// A request body as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(pub Map<String, Value>);

impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| body_error(e.status(), e.body_text()))?;
            return Ok(Payload(form_fields(pairs)));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| body_error(e.status(), e.body_text()))?;
        parse_json_object(&bytes).map(Payload)
    }
}

/// Field name of a form key, and whether the key used list syntax.
fn form_key(key: String) -> (String, bool) {
    if let Some(start) = key.find('[') {
        let index = &key[start + 1..];
        if let Some(index) = index.strip_suffix(']') {
            if index.bytes().all(|b| b.is_ascii_digit()) {
                return (key[..start].to_string(), true);
            }
        }
    }
    (key, false)
}

fn form_fields(pairs: Vec<(String, String)>) -> Map<String, Value> {
    let mut map = Map::new();

    for (key, value) in pairs {
        let (name, is_list) = form_key(key);
        let value = Value::String(value);

        match map.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                let value = if is_list { Value::Array(vec![value]) } else { value };
                map.insert(name, value);
            }
        }
    }

    map
}

fn body_error(status: StatusCode, text: String) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::BodyTooLarge
    } else {
        ApiError::InvalidBody(text)
    }
}

fn parse_json_object(bytes: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::InvalidBody("expected a JSON object".to_string())),
        Err(e) => Err(ApiError::InvalidBody(e.to_string())),
    }
}
