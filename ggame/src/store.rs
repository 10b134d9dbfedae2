//! Persistence contracts for game sessions, messages, and credentials,
//! plus in-memory implementations.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, PoisonError};

use gcommon::{BoxFuture, SessionId};
use gprovider::ProviderId;

use crate::{ChatMessage, GameSession, SessionOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Storage,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Storage, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::NotFound, message)
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for StoreError {}

/// Durable storage for game rounds and their transcripts.
pub trait GameStore: Send + Sync {
    fn insert_session<'a>(
        &'a self,
        session: GameSession,
    ) -> BoxFuture<'a, Result<(), StoreError>>;

    fn load_session<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<GameSession, StoreError>>;

    /// Writes the completion fields of an existing session in one shot.
    fn complete_session<'a>(
        &'a self,
        session_id: &'a SessionId,
        outcome: SessionOutcome,
    ) -> BoxFuture<'a, Result<(), StoreError>>;

    fn append_message<'a>(
        &'a self,
        message: ChatMessage,
    ) -> BoxFuture<'a, Result<(), StoreError>>;

    /// Loads a session's transcript in the order the messages were sent.
    fn load_messages<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<Vec<ChatMessage>, StoreError>>;

    /// Removes a session and every message that belongs to it.
    fn delete_session<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<(), StoreError>>;
}

/// Durable storage for per-backend API keys.
pub trait CredentialStore: Send + Sync {
    fn save_credential<'a>(
        &'a self,
        provider: ProviderId,
        api_key: &'a str,
    ) -> BoxFuture<'a, Result<(), StoreError>>;

    fn load_credential<'a>(
        &'a self,
        provider: ProviderId,
    ) -> BoxFuture<'a, Result<Option<String>, StoreError>>;

    fn delete_credential<'a>(
        &'a self,
        provider: ProviderId,
    ) -> BoxFuture<'a, Result<(), StoreError>>;

    /// Providers that currently have a key on file, for settings
    /// enumeration.
    fn list_credentials<'a>(&'a self) -> BoxFuture<'a, Result<Vec<ProviderId>, StoreError>>;
}

#[derive(Debug, Default)]
pub struct InMemoryGameStore {
    sessions: Mutex<HashMap<SessionId, GameSession>>,
    messages: Mutex<HashMap<SessionId, Vec<ChatMessage>>>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for InMemoryGameStore {
    fn insert_session<'a>(
        &'a self,
        session: GameSession,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            self.sessions
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(session.id.clone(), session);
            Ok(())
        })
    }

    fn load_session<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<GameSession, StoreError>> {
        Box::pin(async move {
            self.sessions
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(session_id)
                .cloned()
                .ok_or_else(|| StoreError::not_found(format!("no session {session_id}")))
        })
    }

    fn complete_session<'a>(
        &'a self,
        session_id: &'a SessionId,
        outcome: SessionOutcome,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
            let session = sessions
                .get_mut(session_id)
                .ok_or_else(|| StoreError::not_found(format!("no session {session_id}")))?;

            session.player_guess = Some(outcome.player_guess);
            session.is_correct = Some(outcome.is_correct);
            session.ended_at = Some(outcome.ended_at);
            Ok(())
        })
    }

    fn append_message<'a>(
        &'a self,
        message: ChatMessage,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            self.messages
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(message.session_id.clone())
                .or_default()
                .push(message);
            Ok(())
        })
    }

    fn load_messages<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<Vec<ChatMessage>, StoreError>> {
        Box::pin(async move {
            Ok(self
                .messages
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(session_id)
                .cloned()
                .unwrap_or_default())
        })
    }

    fn delete_session<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            self.sessions
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(session_id);
            self.messages
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(session_id);
            Ok(())
        })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    credentials: Mutex<HashMap<ProviderId, String>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn save_credential<'a>(
        &'a self,
        provider: ProviderId,
        api_key: &'a str,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            self.credentials
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(provider, api_key.to_string());
            Ok(())
        })
    }

    fn load_credential<'a>(
        &'a self,
        provider: ProviderId,
    ) -> BoxFuture<'a, Result<Option<String>, StoreError>> {
        Box::pin(async move {
            Ok(self
                .credentials
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&provider)
                .cloned())
        })
    }

    fn delete_credential<'a>(
        &'a self,
        provider: ProviderId,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            self.credentials
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&provider);
            Ok(())
        })
    }

    fn list_credentials<'a>(&'a self) -> BoxFuture<'a, Result<Vec<ProviderId>, StoreError>> {
        Box::pin(async move {
            let stored = self
                .credentials
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            // Enumeration order follows ProviderId::ALL for stable output.
            Ok(ProviderId::ALL
                .into_iter()
                .filter(|provider| stored.contains_key(provider))
                .collect())
        })
    }
}
