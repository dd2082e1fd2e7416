use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection};

use super::{check_text_length, AnalyzedText, SentimentStore, StoreError};
use crate::Sentiment;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS sentiment (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        text VARCHAR(500) NOT NULL,
        sentiment INTEGER NOT NULL CHECK (sentiment IN (-1, 0, 1))
    );
";

impl ToSql for Sentiment {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(i64::from(*self)))
    }
}

impl FromSql for Sentiment {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_i64()?;
        Sentiment::try_from(raw).map_err(FromSqlError::OutOfRange)
    }
}

/// SQLite-backed store. A single connection is shared behind a mutex and
/// every statement auto-commits.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file and its schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        log::info!("Opened sentiment store at {:?}", path.as_ref());
        Self::with_connection(conn)
    }

    /// A private database that lives as long as the store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl SentimentStore for SqliteStore {
    fn insert(&self, text: &str, sentiment: Sentiment) -> Result<i64, StoreError> {
        check_text_length(text)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sentiment (text, sentiment) VALUES (?1, ?2)",
            params![text, sentiment],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn fetch_all(&self) -> Result<Vec<AnalyzedText>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, text, sentiment FROM sentiment ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(AnalyzedText {
                id: row.get(0)?,
                text: row.get(1)?,
                sentiment: row.get(2)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}
