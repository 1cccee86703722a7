//! Uniform `(status, body)` result of every API call.
//!
//! # Design
//! The service answers successes with JSON and most failures with an HTML
//! page. `ResponseBody` keeps whichever it got; typed views are opt-in via
//! `decode`, so a 403 page is never turned into an error by the client.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// A response body, parsed as JSON when possible.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(raw.to_string()),
        }
    }

    /// Substring test over the raw text, or over the serialized JSON.
    pub fn contains(&self, needle: &str) -> bool {
        match self {
            ResponseBody::Text(text) => text.contains(needle),
            ResponseBody::Json(Value::String(s)) => s.contains(needle),
            ResponseBody::Json(value) => value.to_string().contains(needle),
        }
    }

    /// Top-level field of a JSON object body.
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => value.get(field),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.get(field).is_some()
    }
}

/// Status code and body exactly as the server sent them.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// View a JSON body as `T`. Fails for text bodies and shape mismatches.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        match &self.body {
            ResponseBody::Json(value) => {
                T::deserialize(value).map_err(|e| ApiError::Deserialization(e.to_string()))
            }
            ResponseBody::Text(text) => Err(ApiError::Deserialization(format!(
                "expected JSON body, got text (status {}): {}",
                self.status,
                truncate(text, 120)
            ))),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
