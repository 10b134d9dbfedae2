//! Adapter construction.

use std::sync::Arc;

use reqwest::Client;

use crate::adapters::anthropic::{AnthropicGuardProvider, AnthropicHttpTransport};
use crate::adapters::openai::{OpenAiGuardProvider, OpenAiHttpTransport};
use crate::{ChatProvider, ProviderId};

/// Builds the HTTP-backed adapter for a backend. The match is exhaustive,
/// so adding a [`ProviderId`] variant fails to compile until an adapter
/// exists for it.
pub fn create_provider(id: ProviderId, client: Client) -> Arc<dyn ChatProvider> {
    match id {
        ProviderId::OpenAi => Arc::new(OpenAiGuardProvider::new(Arc::new(
            OpenAiHttpTransport::new(client),
        ))),
        ProviderId::Anthropic => Arc::new(AnthropicGuardProvider::new(Arc::new(
            AnthropicHttpTransport::new(client),
        ))),
    }
}
