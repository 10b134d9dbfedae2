//! Shared provider error kinds, HTTP classification, and display strings.
//!
//! ```rust
//! use gprovider::{ProviderError, ProviderErrorKind};
//!
//! let auth = ProviderError::invalid_credential("bad key");
//! assert_eq!(auth.kind, ProviderErrorKind::InvalidCredential);
//!
//! let server = ProviderError::server(503);
//! assert_eq!(server.status, Some(503));
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    InvalidCredential,
    Network,
    RateLimited,
    Parsing,
    InvalidResponse,
    Server,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub status: Option<u16>,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidCredential, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Network, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message)
    }

    pub fn parsing(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Parsing, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidResponse, message)
    }

    pub fn server(status: u16) -> Self {
        Self {
            kind: ProviderErrorKind::Server,
            message: format!("HTTP {status}"),
            status: Some(status),
        }
    }

    fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Human-readable text the orchestrator surfaces to the player.
    pub fn user_message(&self) -> String {
        match self.kind {
            ProviderErrorKind::InvalidCredential => {
                "Invalid API key. Please check your API key in Settings.".to_string()
            }
            ProviderErrorKind::Network => format!("Network error: {}", self.message),
            ProviderErrorKind::RateLimited => {
                "Rate limit exceeded. Please wait a moment and try again.".to_string()
            }
            ProviderErrorKind::Parsing => format!("Error parsing response: {}", self.message),
            ProviderErrorKind::InvalidResponse => {
                "Received invalid response from API.".to_string()
            }
            ProviderErrorKind::Server => format!(
                "Server error (code {}). Please try again later.",
                self.status.unwrap_or_default()
            ),
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ProviderError {}

/// Maps a non-success HTTP status (plus any backend-supplied error
/// message) onto the provider error taxonomy. Success statuses never
/// reach this function.
pub fn classify_http_failure(status: u16, backend_message: Option<String>) -> ProviderError {
    let message = backend_message.unwrap_or_else(|| format!("HTTP {status}"));

    match status {
        401 => ProviderError::invalid_credential(message).with_status(status),
        429 => ProviderError::rate_limited(message).with_status(status),
        500..=599 => ProviderError::server(status),
        _ => ProviderError::network(message).with_status(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_follows_the_status_table() {
        let auth = classify_http_failure(401, None);
        assert_eq!(auth.kind, ProviderErrorKind::InvalidCredential);

        let limited = classify_http_failure(429, Some("slow down".to_string()));
        assert_eq!(limited.kind, ProviderErrorKind::RateLimited);
        assert_eq!(limited.message, "slow down");

        let server = classify_http_failure(503, None);
        assert_eq!(server.kind, ProviderErrorKind::Server);
        assert_eq!(server.status, Some(503));

        let bad_request = classify_http_failure(400, Some("model not found".to_string()));
        assert_eq!(bad_request.kind, ProviderErrorKind::Network);
        assert_eq!(bad_request.message, "model not found");

        let unparseable = classify_http_failure(404, None);
        assert_eq!(unparseable.kind, ProviderErrorKind::Network);
        assert_eq!(unparseable.message, "HTTP 404");
    }

    #[test]
    fn user_messages_match_the_display_contract() {
        assert_eq!(
            ProviderError::invalid_credential("x").user_message(),
            "Invalid API key. Please check your API key in Settings."
        );
        assert_eq!(
            ProviderError::network("connection reset").user_message(),
            "Network error: connection reset"
        );
        assert_eq!(
            ProviderError::rate_limited("x").user_message(),
            "Rate limit exceeded. Please wait a moment and try again."
        );
        assert_eq!(
            ProviderError::parsing("missing field").user_message(),
            "Error parsing response: missing field"
        );
        assert_eq!(
            ProviderError::invalid_response("x").user_message(),
            "Received invalid response from API."
        );
        assert_eq!(
            ProviderError::server(502).user_message(),
            "Server error (code 502). Please try again later."
        );
    }
}
