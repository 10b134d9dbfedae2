//! Tracing-based observability hooks for game lifecycle events.
//!
//! ```rust
//! use gobserve::TracingGameHooks;
//! use ggame::GameRuntimeHooks;
//!
//! fn accepts_game_hooks(_hooks: &dyn GameRuntimeHooks) {}
//!
//! let hooks = TracingGameHooks;
//! accepts_game_hooks(&hooks);
//! ```

use gcommon::SessionId;
use ggame::{GameRuntimeHooks, StoreError};
use gprovider::{ProviderError, ProviderId};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingGameHooks;

impl GameRuntimeHooks for TracingGameHooks {
    fn on_game_started(&self, session_id: &SessionId, provider: ProviderId) {
        tracing::info!(
            phase = "game",
            event = "started",
            session_id = %session_id,
            provider = %provider
        );
    }

    fn on_turn_start(&self, session_id: &SessionId) {
        tracing::info!(phase = "exchange", event = "turn_start", session_id = %session_id);
    }

    fn on_exchange_succeeded(&self, session_id: &SessionId, provider: ProviderId) {
        tracing::info!(
            phase = "exchange",
            event = "success",
            session_id = %session_id,
            provider = %provider
        );
    }

    fn on_exchange_failed(
        &self,
        session_id: &SessionId,
        provider: ProviderId,
        error: &ProviderError,
    ) {
        tracing::error!(
            phase = "exchange",
            event = "failure",
            session_id = %session_id,
            provider = %provider,
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_persistence_failure(&self, session_id: &SessionId, error: &StoreError) {
        tracing::warn!(
            phase = "store",
            event = "failure",
            session_id = %session_id,
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_guess_made(&self, session_id: &SessionId, correct: bool) {
        tracing::info!(
            phase = "game",
            event = "guess",
            session_id = %session_id,
            correct
        );
    }

    fn on_game_reset(&self) {
        tracing::info!(phase = "game", event = "reset");
    }
}
