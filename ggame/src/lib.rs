//! Two-guards riddle orchestration over chat providers.
//!
//! One guard always tells the truth, the other always lies. A round
//! pits the player against a randomly chosen guard persona served by a
//! chat backend; the player converses, then guesses which guard they
//! were talking to.

mod hooks;
mod manager;
mod picker;
mod store;
mod types;

pub mod prelude {
    pub use crate::{
        ChatMessage, CredentialStore, FixedGuardPicker, GameManager, GameRuntimeHooks,
        GameSession, GameState, GameStore, GuardKind, GuardPicker, InMemoryCredentialStore,
        InMemoryGameStore, NoopGameHooks, RandomGuardPicker, SessionOutcome, StoreError,
        StoreErrorKind,
    };
    pub use gcommon::{BoxFuture, MessageId, SessionId};
}

pub use hooks::{GameRuntimeHooks, NoopGameHooks};
pub use manager::GameManager;
pub use picker::{FixedGuardPicker, GuardPicker, RandomGuardPicker};
pub use store::{
    CredentialStore, GameStore, InMemoryCredentialStore, InMemoryGameStore, StoreError,
    StoreErrorKind,
};
pub use types::{ChatMessage, GameSession, GameState, GuardKind, SessionOutcome};
pub use gcommon::{BoxFuture, MessageId, SessionId};
