//! SQLite-backed persistence for game sessions, transcripts, and
//! credentials.

mod sqlite;

pub use sqlite::SqliteGameStore;
