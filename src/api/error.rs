//! API error taxonomy and error-body normalization.
use serde_json::Value;
use thiserror::Error;

/// Failure modes of one remote call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {path}")]
    NotFound { path: String },
    #[error("session expired; log in again")]
    Auth,
    #[error("remote error ({status}): {message}")]
    Remote { status: u16, message: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Unwrap a remote error body into one human-readable message.
///
/// Known shapes, in priority order: a `message` field, an `error` field, a
/// `detail` field, then a per-field validation map under `errors`; anything
/// else falls back to a generic message.
pub fn normalize_error_body(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return fallback_message(body);
    };
    for key in ["message", "error", "detail"] {
        if let Some(text) = value.get(key).and_then(Value::as_str) {
            if !text.trim().is_empty() {
                return text.trim().to_string();
            }
        }
    }
    if let Some(map) = value.get("errors").and_then(Value::as_object) {
        let mut parts = Vec::new();
        for (field, detail) in map {
            let rendered = match detail {
                Value::String(text) => text.clone(),
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("; "),
                other => other.to_string(),
            };
            parts.push(format!("{field}: {rendered}"));
        }
        if !parts.is_empty() {
            return parts.join("; ");
        }
    }
    fallback_message(body)
}

fn fallback_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "request failed".to_string()
    } else {
        let mut preview: String = trimmed.chars().take(120).collect();
        if preview.len() < trimmed.len() {
            preview.push_str("...");
        }
        format!("request failed: {preview}")
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
