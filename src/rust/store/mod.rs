//! Persistence of analyzed texts.
//!
//! The HTTP layer talks to [`SentimentStore`] only; [`SqliteStore`] is the
//! implementation the binary uses.

mod sqlite;

pub use sqlite::SqliteStore;

use serde::Serialize;

use crate::Sentiment;

/// Longest text, in characters, a record may hold.
pub const MAX_TEXT_CHARS: usize = 500;

/// One persisted classification. Records are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzedText {
    pub id: i64,
    pub text: String,
    pub sentiment: Sentiment,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Text is {len} characters long, max is {max}")]
    TextTooLong { len: usize, max: usize },
    #[error("Store connection lock poisoned")]
    Poisoned,
}

/// Append-only repository of analyzed texts.
pub trait SentimentStore: Send + Sync {
    /// Appends a record and returns its id. Ids strictly increase.
    fn insert(&self, text: &str, sentiment: Sentiment) -> Result<i64, StoreError>;

    /// Every stored record, oldest first.
    fn fetch_all(&self) -> Result<Vec<AnalyzedText>, StoreError>;
}

/// Rejects text a record cannot hold.
pub fn check_text_length(text: &str) -> Result<(), StoreError> {
    let len = text.chars().count();
    if len > MAX_TEXT_CHARS {
        return Err(StoreError::TextTooLong { len, max: MAX_TEXT_CHARS });
    }
    Ok(())
}
