//! Key-kind-value record store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide `load`/`save` over the `kvs` table for every record kind.
//! - Offer typed accessors that reject a key holding the wrong kind.
//!
//! # Invariants
//! - `save` is an upsert; the last write for a key wins.
//! - Read paths reject undecodable rows instead of masking them.

use crate::db::DbError;
use crate::model::application::ApplicationRecord;
use crate::model::datum::Datum;
use crate::model::grid_record::GridRecord;
use crate::model::record::{Record, RecordKind};
use crate::model::RecordKey;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Record store error for persistence and decoding failures.
#[derive(Debug)]
pub enum RepoError {
    /// No record exists under the key. Callers may create a default.
    NotFound(RecordKey),
    Db(DbError),
    Serialization(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(key) => write!(f, "record not found: {key}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "record serialization failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Keyed persistence contract used by the session layer.
pub trait RecordStore {
    /// Loads one record, failing with `NotFound` when the key is absent.
    fn load(&self, key: &str) -> RepoResult<Record>;
    /// Inserts or replaces the record under its own key.
    fn save(&self, record: &Record) -> RepoResult<()>;
    /// Lists every record of one kind, ordered by key.
    fn list_kind(&self, kind: RecordKind) -> RepoResult<Vec<Record>>;

    fn load_datum(&self, key: &str) -> RepoResult<Datum> {
        match self.load(key)? {
            Record::Datum(datum) => Ok(datum),
            other => Err(wrong_kind(key, RecordKind::Datum, other.kind())),
        }
    }

    fn load_grid(&self, key: &str) -> RepoResult<GridRecord> {
        match self.load(key)? {
            Record::Grid(grid) => Ok(grid),
            other => Err(wrong_kind(key, RecordKind::Grid, other.kind())),
        }
    }

    fn load_application(&self, key: &str) -> RepoResult<ApplicationRecord> {
        match self.load(key)? {
            Record::Application(app) => Ok(app),
            other => Err(wrong_kind(key, RecordKind::Application, other.kind())),
        }
    }

    /// Finds the first datum (by key order) with exactly this name.
    fn find_datum_by_name(&self, name: &str) -> RepoResult<Option<Datum>> {
        for record in self.list_kind(RecordKind::Datum)? {
            if let Record::Datum(datum) = record {
                if datum.name == name {
                    return Ok(Some(datum));
                }
            }
        }
        Ok(None)
    }
}

fn wrong_kind(key: &str, expected: RecordKind, actual: RecordKind) -> RepoError {
    RepoError::InvalidData(format!(
        "record `{key}` is `{}`, expected `{}`",
        actual.as_str(),
        expected.as_str()
    ))
}

/// SQLite-backed record store.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn load(&self, key: &str) -> RepoResult<Record> {
        let row = self
            .conn
            .query_row(
                "SELECT kind, value FROM kvs WHERE key = ?1;",
                [key],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        let Some((kind_text, value)) = row else {
            return Err(RepoError::NotFound(key.to_string()));
        };
        decode_row(key, &kind_text, &value)
    }

    fn save(&self, record: &Record) -> RepoResult<()> {
        let value = record.encode()?;
        self.conn.execute(
            "REPLACE INTO kvs (key, kind, value) VALUES (?1, ?2, ?3);",
            params![record.key(), record.kind().as_str(), value],
        )?;
        debug!(
            "event=record_save module=repo status=ok kind={} bytes={}",
            record.kind().as_str(),
            value.len()
        );
        Ok(())
    }

    fn list_kind(&self, kind: RecordKind) -> RepoResult<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM kvs WHERE kind = ?1 ORDER BY key ASC;")?;
        let mut rows = stmt.query([kind.as_str()])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            let key: String = row.get(0)?;
            let value: String = row.get(1)?;
            records.push(decode_row(&key, kind.as_str(), &value)?);
        }

        Ok(records)
    }
}

fn decode_row(key: &str, kind_text: &str, value: &str) -> RepoResult<Record> {
    let kind = RecordKind::parse(kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("unknown kind `{kind_text}` for record `{key}`"))
    })?;
    let record = Record::decode(kind, value)?;
    if record.key() != key {
        return Err(RepoError::InvalidData(format!(
            "record stored under `{key}` carries key `{}`",
            record.key()
        )));
    }
    Ok(record)
}
