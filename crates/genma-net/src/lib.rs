//! Genma Networking
//!
//! A small request helper: JSON in, JSON or text out, with defaults that
//! can be injected once and reused.

mod request;

pub use request::{
    Method, PreparedRequest, RequestBody, RequestDefaults, RequestOptions, Requester, ResponseType,
    ResponseValue,
};
pub use url::Url;

/// Issue a request with no injected defaults
pub fn request(url: &str, options: RequestOptions) -> Result<ResponseValue, RequestError> {
    Requester::new().request(url, options)
}

/// Request error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    /// Non-2xx response; carries the response text
    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RequestError::Decode(e.to_string())
        } else {
            RequestError::Network(e.to_string())
        }
    }
}
