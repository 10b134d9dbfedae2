use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use gcommon::time::{from_unix_millis, unix_millis};
use gcommon::{BoxFuture, MessageId, SessionId};
use ggame::{
    ChatMessage, CredentialStore, GameSession, GameStore, GuardKind, SessionOutcome, StoreError,
};
use gprovider::{ProviderId, TurnRole};
use rusqlite::{Connection, OptionalExtension, params};

/// Durable [`GameStore`] and [`CredentialStore`] over a single SQLite
/// database. Transcript order is the insertion rowid, so it survives
/// clock ties between messages.
#[derive(Debug)]
pub struct SqliteGameStore {
    connection: Mutex<Connection>,
}

impl SqliteGameStore {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|error| {
                StoreError::storage(format!("failed to create sqlite parent directory: {error}"))
            })?;
        }

        let connection = Connection::open(path).map_err(|error| {
            StoreError::storage(format!("failed to open sqlite database: {error}"))
        })?;
        Self::from_connection(connection)
    }

    pub fn new_in_memory() -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory().map_err(|error| {
            StoreError::storage(format!("failed to open in-memory sqlite database: {error}"))
        })?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self, StoreError> {
        connection
            .busy_timeout(Duration::from_secs(5))
            .map_err(|error| {
                StoreError::storage(format!("failed to configure sqlite busy timeout: {error}"))
            })?;

        let store = Self {
            connection: Mutex::new(connection),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.connection
            .lock()
            .map_err(|_| StoreError::storage("sqlite store lock poisoned"))
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self.connection()?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS game_sessions (
                session_id TEXT PRIMARY KEY,
                guard TEXT NOT NULL,
                player_guess TEXT,
                is_correct INTEGER,
                started_at_ms INTEGER NOT NULL,
                ended_at_ms INTEGER
            );

            CREATE TABLE IF NOT EXISTS chat_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                message_id TEXT NOT NULL,
                session_id TEXT NOT NULL
                    REFERENCES game_sessions(session_id) ON DELETE CASCADE,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                sent_at_ms INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_messages_session_id
            ON chat_messages(session_id, id);

            CREATE TABLE IF NOT EXISTS credentials (
                provider TEXT PRIMARY KEY,
                api_key TEXT NOT NULL,
                created_at_ms INTEGER NOT NULL,
                last_modified_ms INTEGER NOT NULL
            );
            ",
        )
        .map_err(|error| {
            StoreError::storage(format!("failed to initialize sqlite schema: {error}"))
        })?;

        Ok(())
    }
}

fn parse_guard(value: &str) -> Result<GuardKind, StoreError> {
    GuardKind::parse(value)
        .ok_or_else(|| StoreError::storage(format!("unknown guard value in store: {value}")))
}

fn parse_role(value: &str) -> Result<TurnRole, StoreError> {
    TurnRole::parse(value)
        .ok_or_else(|| StoreError::storage(format!("unknown role value in store: {value}")))
}

impl GameStore for SqliteGameStore {
    fn insert_session<'a>(
        &'a self,
        session: GameSession,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let conn = self.connection()?;
            conn.execute(
                "
                INSERT INTO game_sessions (
                    session_id, guard, player_guess, is_correct, started_at_ms, ended_at_ms
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
                params![
                    session.id.as_str(),
                    session.guard.as_str(),
                    session.player_guess.map(GuardKind::as_str),
                    session.is_correct,
                    unix_millis(session.started_at),
                    session.ended_at.map(unix_millis),
                ],
            )
            .map_err(|error| StoreError::storage(format!("failed to insert session: {error}")))?;

            Ok(())
        })
    }

    fn load_session<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<GameSession, StoreError>> {
        Box::pin(async move {
            let conn = self.connection()?;
            let row = conn
                .query_row(
                    "
                    SELECT guard, player_guess, is_correct, started_at_ms, ended_at_ms
                    FROM game_sessions
                    WHERE session_id = ?1
                    ",
                    params![session_id.as_str()],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, Option<String>>(1)?,
                            row.get::<_, Option<bool>>(2)?,
                            row.get::<_, i64>(3)?,
                            row.get::<_, Option<i64>>(4)?,
                        ))
                    },
                )
                .optional()
                .map_err(|error| StoreError::storage(format!("failed to load session: {error}")))?
                .ok_or_else(|| StoreError::not_found(format!("no session {session_id}")))?;

            let (guard, player_guess, is_correct, started_at_ms, ended_at_ms) = row;
            Ok(GameSession {
                id: session_id.clone(),
                guard: parse_guard(&guard)?,
                player_guess: player_guess.as_deref().map(parse_guard).transpose()?,
                is_correct,
                started_at: from_unix_millis(started_at_ms),
                ended_at: ended_at_ms.map(from_unix_millis),
            })
        })
    }

    fn complete_session<'a>(
        &'a self,
        session_id: &'a SessionId,
        outcome: SessionOutcome,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let conn = self.connection()?;
            let updated = conn
                .execute(
                    "
                    UPDATE game_sessions
                    SET player_guess = ?2, is_correct = ?3, ended_at_ms = ?4
                    WHERE session_id = ?1
                    ",
                    params![
                        session_id.as_str(),
                        outcome.player_guess.as_str(),
                        outcome.is_correct,
                        unix_millis(outcome.ended_at),
                    ],
                )
                .map_err(|error| {
                    StoreError::storage(format!("failed to complete session: {error}"))
                })?;

            if updated == 0 {
                return Err(StoreError::not_found(format!("no session {session_id}")));
            }

            Ok(())
        })
    }

    fn append_message<'a>(
        &'a self,
        message: ChatMessage,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let conn = self.connection()?;
            conn.execute(
                "
                INSERT INTO chat_messages (message_id, session_id, role, content, sent_at_ms)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ",
                params![
                    message.id.as_str(),
                    message.session_id.as_str(),
                    message.role.as_str(),
                    &message.content,
                    unix_millis(message.sent_at),
                ],
            )
            .map_err(|error| StoreError::storage(format!("failed to append message: {error}")))?;

            Ok(())
        })
    }

    fn load_messages<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<Vec<ChatMessage>, StoreError>> {
        Box::pin(async move {
            let conn = self.connection()?;
            let mut statement = conn
                .prepare(
                    "
                    SELECT message_id, role, content, sent_at_ms
                    FROM chat_messages
                    WHERE session_id = ?1
                    ORDER BY id
                    ",
                )
                .map_err(|error| {
                    StoreError::storage(format!("failed to prepare message query: {error}"))
                })?;

            let rows = statement
                .query_map(params![session_id.as_str()], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                })
                .map_err(|error| {
                    StoreError::storage(format!("failed to query messages: {error}"))
                })?;

            let mut messages = Vec::new();
            for row in rows {
                let (message_id, role, content, sent_at_ms) = row.map_err(|error| {
                    StoreError::storage(format!("failed to read message row: {error}"))
                })?;

                messages.push(ChatMessage {
                    id: MessageId::new(message_id),
                    session_id: session_id.clone(),
                    role: parse_role(&role)?,
                    content,
                    sent_at: from_unix_millis(sent_at_ms),
                });
            }

            Ok(messages)
        })
    }

    fn delete_session<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let conn = self.connection()?;
            // ON DELETE CASCADE removes the transcript with the session.
            conn.execute(
                "DELETE FROM game_sessions WHERE session_id = ?1",
                params![session_id.as_str()],
            )
            .map_err(|error| StoreError::storage(format!("failed to delete session: {error}")))?;

            Ok(())
        })
    }
}

impl CredentialStore for SqliteGameStore {
    fn save_credential<'a>(
        &'a self,
        provider: ProviderId,
        api_key: &'a str,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let now = unix_millis(std::time::SystemTime::now());
            let conn = self.connection()?;
            conn.execute(
                "
                INSERT INTO credentials (provider, api_key, created_at_ms, last_modified_ms)
                VALUES (?1, ?2, ?3, ?3)
                ON CONFLICT(provider) DO UPDATE SET
                    api_key = excluded.api_key,
                    last_modified_ms = excluded.last_modified_ms
                ",
                params![provider.to_string(), api_key, now],
            )
            .map_err(|error| StoreError::storage(format!("failed to save credential: {error}")))?;

            Ok(())
        })
    }

    fn load_credential<'a>(
        &'a self,
        provider: ProviderId,
    ) -> BoxFuture<'a, Result<Option<String>, StoreError>> {
        Box::pin(async move {
            let conn = self.connection()?;
            conn.query_row(
                "SELECT api_key FROM credentials WHERE provider = ?1",
                params![provider.to_string()],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|error| StoreError::storage(format!("failed to load credential: {error}")))
        })
    }

    fn delete_credential<'a>(
        &'a self,
        provider: ProviderId,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let conn = self.connection()?;
            conn.execute(
                "DELETE FROM credentials WHERE provider = ?1",
                params![provider.to_string()],
            )
            .map_err(|error| {
                StoreError::storage(format!("failed to delete credential: {error}"))
            })?;

            Ok(())
        })
    }

    fn list_credentials<'a>(&'a self) -> BoxFuture<'a, Result<Vec<ProviderId>, StoreError>> {
        Box::pin(async move {
            let conn = self.connection()?;
            let mut statement = conn
                .prepare("SELECT provider FROM credentials")
                .map_err(|error| {
                    StoreError::storage(format!("failed to prepare credential query: {error}"))
                })?;

            let rows = statement
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(|error| {
                    StoreError::storage(format!("failed to query credentials: {error}"))
                })?;

            let mut stored = Vec::new();
            for row in rows {
                let provider = row.map_err(|error| {
                    StoreError::storage(format!("failed to read credential row: {error}"))
                })?;
                // Rows written by an unknown newer build are skipped
                // rather than failing the whole listing.
                if let Some(provider) = ProviderId::parse(&provider) {
                    stored.push(provider);
                }
            }

            Ok(ProviderId::ALL
                .into_iter()
                .filter(|provider| stored.contains(provider))
                .collect())
        })
    }
}
