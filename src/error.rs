//! Site Errors
//!
//! One error type for every fallible browser, network and storage call.
//! Callers degrade the affected feature and log; nothing here is fatal.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("required element not found: {0}")]
    MissingElement(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("request failed with status {status}")]
    Http { status: u16, message: Option<String> },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("invalid url: {0}")]
    Url(String),

    #[error("browser error: {0}")]
    Js(String),
}

impl SiteError {
    /// Wrap a thrown JS value
    pub fn js(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }

    pub fn missing(selector: impl Into<String>) -> Self {
        Self::MissingElement(selector.into())
    }

    /// Reason reported by the server, if it sent one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { message: Some(message), .. } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SiteError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}
