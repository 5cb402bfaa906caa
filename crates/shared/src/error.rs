use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error payload a backend may attach to a non-2xx response.
///
/// Backends in the wild use either `message` or `error` for the human-readable
/// text, so both are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        [self.message.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
    }
}

/// Pulls a displayable message out of a raw error response body.
///
/// Accepts an [`ErrorBody`] object, a bare JSON string, or plain text. Any other
/// JSON value (arrays, numbers, objects without a message) yields `None`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(text)) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Ok(value @ serde_json::Value::Object(_)) => serde_json::from_value::<ErrorBody>(value)
            .ok()
            .and_then(|parsed| parsed.text().map(str::to_string)),
        Ok(_) => None,
        Err(_) => Some(body.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ISO date '{0}', expected YYYY-MM-DD")]
pub struct InvalidIsoDate(pub String);
