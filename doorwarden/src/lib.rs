//! Unified facade over the doorwarden workspace crates.
//!
//! This crate is designed to be the single dependency for most
//! applications. It re-exports the core doorwarden crates and provides
//! wiring helpers that connect credential storage, provider adapters,
//! and the game manager.
//!
//! ```rust
//! use doorwarden::prelude::*;
//!
//! let config = GameBuildConfig::new(ProviderId::Anthropic);
//! let _ = config;
//! ```

pub mod prelude;
pub mod runtime;

pub use gcommon;
pub use ggame;
pub use gobserve;
pub use gprovider;
pub use gstore;

pub use gcommon::{BoxFuture, MessageId, SessionId};
pub use ggame::{
    ChatMessage, CredentialStore, FixedGuardPicker, GameManager, GameRuntimeHooks, GameSession,
    GameState, GameStore, GuardKind, GuardPicker, InMemoryCredentialStore, InMemoryGameStore,
    NoopGameHooks, RandomGuardPicker, SessionOutcome, StoreError, StoreErrorKind,
};
pub use gobserve::{MetricsGameHooks, TracingGameHooks};
pub use gprovider::{
    ChatProvider, ChatRequest, ConversationTurn, CredentialSlot, ProviderError,
    ProviderErrorKind, ProviderFuture, ProviderId, SecretString, TurnRole, create_provider,
};
pub use gstore::SqliteGameStore;

pub use runtime::{
    GameBuildConfig, GameRuntime, SetupError, build_game_manager, configured_provider,
    validate_and_save_credential,
};
