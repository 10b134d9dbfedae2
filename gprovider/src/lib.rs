//! Chat-backend abstraction for the doorwarden game.
//!
//! Each supported backend sits behind the [`ChatProvider`] trait, which
//! normalizes credential handling, message exchange, and error
//! classification so callers never touch backend wire formats.

pub mod adapters;
mod credentials;
mod error;
mod factory;
mod model;
mod provider;

pub mod prelude {
    pub use crate::{
        ChatProvider, ChatRequest, ConversationTurn, CredentialSlot, ProviderError,
        ProviderErrorKind, ProviderFuture, ProviderId, SecretString, TurnRole, create_provider,
    };
}

pub use credentials::{CredentialSlot, SecretString};
pub use error::{ProviderError, ProviderErrorKind, classify_http_failure};
pub use factory::create_provider;
pub use model::{ChatRequest, ConversationTurn, TurnRole};
pub use provider::{ChatProvider, ProviderFuture, ProviderId};
