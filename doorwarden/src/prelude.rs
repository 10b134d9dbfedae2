//! Common imports for most doorwarden applications.

pub use crate::{
    GameBuildConfig, GameRuntime, SetupError, build_game_manager, configured_provider,
    validate_and_save_credential,
};
pub use crate::{
    BoxFuture, ChatMessage, ChatProvider, ChatRequest, ConversationTurn, CredentialStore,
    FixedGuardPicker, GameManager, GameRuntimeHooks, GameSession, GameState, GameStore,
    GuardKind, GuardPicker, InMemoryCredentialStore, InMemoryGameStore, MessageId,
    MetricsGameHooks, NoopGameHooks, ProviderError, ProviderErrorKind, ProviderId,
    RandomGuardPicker, SessionId, SessionOutcome, SqliteGameStore, StoreError, StoreErrorKind,
    TracingGameHooks, TurnRole, create_provider,
};
