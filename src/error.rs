use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

use crate::types::ErrorBody;

pub const UNKNOWN_ERROR_TEXT: &str = "An unknown error occurred.";
pub const NO_DETAILS_TEXT: &str = "No details.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}")]
    Status { status: u16, body: Option<ErrorBody> },

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text shown in place of the pending bot message when a send fails.
    /// Only a structured error body contributes; everything else falls back.
    pub fn transcript_text(&self) -> String {
        let body = match self {
            ApiError::Status { body: Some(body), .. } => Some(body),
            _ => None,
        };
        let message = body
            .and_then(|b| b.error.clone())
            .unwrap_or_else(|| UNKNOWN_ERROR_TEXT.to_string());
        let details = body
            .and_then(|b| b.details.as_ref())
            .and_then(|d| serde_json::to_string(d).ok())
            .unwrap_or_else(|| NO_DETAILS_TEXT.to_string());
        format!("⚠️ Error: {}\n📄 Details: {}", message, details)
    }
}

impl From<JsValue> for ApiError {
    fn from(value: JsValue) -> Self {
        let text = match value.dyn_ref::<js_sys::Error>() {
            Some(err) => String::from(err.message()),
            None => value.as_string().unwrap_or_else(|| format!("{:?}", value)),
        };
        ApiError::Network(text)
    }
}

impl From<serde_wasm_bindgen::Error> for ApiError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid API base URL '{value}': {source}")]
    BaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API base URL '{0}' cannot carry a path")]
    NotABase(String),

    #[error("unknown log level '{0}'")]
    LogLevel(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transcript_text_with_structured_body() {
        let err = ApiError::Status {
            status: 429,
            body: Some(ErrorBody {
                error: Some("rate_limited".to_string()),
                details: Some(json!({"retry_after": 5})),
            }),
        };
        let text = err.transcript_text();
        assert!(text.contains("rate_limited"));
        assert!(text.contains(r#"{"retry_after":5}"#));
    }

    #[test]
    fn test_transcript_text_fallbacks() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(
            err.transcript_text(),
            format!("⚠️ Error: {}\n📄 Details: {}", UNKNOWN_ERROR_TEXT, NO_DETAILS_TEXT)
        );

        let err = ApiError::Status {
            status: 500,
            body: Some(ErrorBody {
                error: Some("boom".to_string()),
                details: None,
            }),
        };
        let text = err.transcript_text();
        assert!(text.contains("boom"));
        assert!(text.contains(NO_DETAILS_TEXT));

        let err = ApiError::Status { status: 502, body: None };
        assert!(err.transcript_text().contains(UNKNOWN_ERROR_TEXT));
    }
}
