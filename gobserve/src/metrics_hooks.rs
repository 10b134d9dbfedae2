//! Metrics-based observability hooks for game lifecycle events.
//!
//! ```rust
//! use gobserve::MetricsGameHooks;
//! use ggame::GameRuntimeHooks;
//!
//! fn accepts_game_hooks(_hooks: &dyn GameRuntimeHooks) {}
//!
//! let hooks = MetricsGameHooks;
//! accepts_game_hooks(&hooks);
//! ```

use gcommon::SessionId;
use ggame::{GameRuntimeHooks, StoreError};
use gprovider::{ProviderError, ProviderId};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsGameHooks;

impl GameRuntimeHooks for MetricsGameHooks {
    fn on_game_started(&self, _session_id: &SessionId, provider: ProviderId) {
        metrics::counter!(
            "doorwarden_games_started_total",
            "provider" => provider.to_string()
        )
        .increment(1);
    }

    fn on_turn_start(&self, _session_id: &SessionId) {
        metrics::counter!("doorwarden_turns_total").increment(1);
    }

    fn on_exchange_succeeded(&self, _session_id: &SessionId, provider: ProviderId) {
        metrics::counter!(
            "doorwarden_exchange_success_total",
            "provider" => provider.to_string()
        )
        .increment(1);
    }

    fn on_exchange_failed(
        &self,
        _session_id: &SessionId,
        provider: ProviderId,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "doorwarden_exchange_failure_total",
            "provider" => provider.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }

    fn on_persistence_failure(&self, _session_id: &SessionId, error: &StoreError) {
        metrics::counter!(
            "doorwarden_store_failure_total",
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }

    fn on_guess_made(&self, _session_id: &SessionId, correct: bool) {
        metrics::counter!(
            "doorwarden_guesses_total",
            "correct" => correct.to_string()
        )
        .increment(1);
    }

    fn on_game_reset(&self) {
        metrics::counter!("doorwarden_games_reset_total").increment(1);
    }
}
