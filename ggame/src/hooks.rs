//! Observability seam for game lifecycle events.

use gcommon::SessionId;
use gprovider::{ProviderError, ProviderId};

use crate::StoreError;

/// Callbacks fired by the game manager at lifecycle boundaries. All
/// methods default to no-ops so implementors only override the events
/// they care about. The hooks never learn which guard is on the door
/// while a game is live.
pub trait GameRuntimeHooks: Send + Sync {
    fn on_game_started(&self, _session_id: &SessionId, _provider: ProviderId) {}

    fn on_turn_start(&self, _session_id: &SessionId) {}

    fn on_exchange_succeeded(&self, _session_id: &SessionId, _provider: ProviderId) {}

    fn on_exchange_failed(
        &self,
        _session_id: &SessionId,
        _provider: ProviderId,
        _error: &ProviderError,
    ) {
    }

    fn on_persistence_failure(&self, _session_id: &SessionId, _error: &StoreError) {}

    fn on_guess_made(&self, _session_id: &SessionId, _correct: bool) {}

    fn on_game_reset(&self) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGameHooks;

impl GameRuntimeHooks for NoopGameHooks {}
