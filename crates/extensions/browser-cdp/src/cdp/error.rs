//! CDP error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CdpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Nothing answers `/json/version` on the endpoint.
    #[error("Chrome not available at {0}")]
    ChromeNotAvailable(String),

    #[error("DevTools socket error: {0}")]
    WebSocket(String),

    /// The browser rejected a command.
    #[error("CDP error {code}: {message}")]
    Protocol { code: i64, message: String },

    #[error("Malformed CDP payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("DevTools HTTP request failed: {0}")]
    Http(String),

    /// `Page.navigate` error text, verbatim (`net::ERR_CONNECTION_REFUSED`, ...).
    #[error("{0}")]
    NavigationFailed(String),

    /// Exception text from `Runtime.evaluate`, verbatim.
    #[error("{0}")]
    JavaScript(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Session closed")]
    SessionClosed,

    #[error("Unexpected CDP response: {0}")]
    InvalidResponse(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

impl From<base64::DecodeError> for CdpError {
    fn from(e: base64::DecodeError) -> Self {
        CdpError::InvalidResponse(format!("screenshot is not base64: {}", e))
    }
}
