//! The provider contract shared by every backend adapter.
//!
//! ```rust
//! use gprovider::ProviderId;
//!
//! assert_eq!(ProviderId::OpenAi.to_string(), "openai");
//! assert_eq!(ProviderId::Anthropic.display_name(), "Claude");
//! assert_eq!(ProviderId::parse("anthropic"), Some(ProviderId::Anthropic));
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{ChatRequest, ProviderError};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The closed set of supported backends. Construction dispatches on this
/// enum exhaustively, so a new backend fails to compile until every
/// match arm handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenAi,
    Anthropic,
}

impl ProviderId {
    pub const ALL: [ProviderId; 2] = [ProviderId::OpenAi, ProviderId::Anthropic];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::OpenAi => "ChatGPT",
            Self::Anthropic => "Claude",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "openai" => Some(Self::OpenAi),
            "anthropic" => Some(Self::Anthropic),
            _ => None,
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let id = match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        };

        f.write_str(id)
    }
}

/// Capability set every adapter implements: store a credential, exchange
/// one normalized turn, and probe the stored credential.
///
/// Adapters never retry; every failure is classified into
/// [`ProviderError`](crate::ProviderError) and returned to the caller.
pub trait ChatProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Stores the API key on the adapter instance. Side effect only — no
    /// I/O is performed and repeated calls simply overwrite.
    fn configure(&self, api_key: &str) -> Result<(), ProviderError>;

    /// Sends one completion request and returns the extracted reply
    /// text. Fails with `InvalidCredential` before any I/O when no
    /// non-empty key is configured.
    fn send_message<'a>(
        &'a self,
        request: ChatRequest,
    ) -> ProviderFuture<'a, Result<String, ProviderError>>;

    /// Issues a minimal probe request and reports whether the backend
    /// accepted the stored credential. Authentication failures (including
    /// an unconfigured slot) propagate as errors; any other failure maps
    /// to `Ok(false)`.
    fn validate_credential<'a>(&'a self) -> ProviderFuture<'a, Result<bool, ProviderError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_id_display_is_stable() {
        assert_eq!(ProviderId::OpenAi.to_string(), "openai");
        assert_eq!(ProviderId::Anthropic.to_string(), "anthropic");
    }

    #[test]
    fn provider_id_round_trips_through_parse() {
        for id in ProviderId::ALL {
            assert_eq!(ProviderId::parse(&id.to_string()), Some(id));
        }

        assert_eq!(ProviderId::parse("gemini"), None);
    }

    #[test]
    fn display_names_cover_the_settings_picker() {
        assert_eq!(ProviderId::OpenAi.display_name(), "ChatGPT");
        assert_eq!(ProviderId::Anthropic.display_name(), "Claude");
    }
}
