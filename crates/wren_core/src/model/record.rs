//! Closed set of persisted record kinds.
//!
//! # Responsibility
//! - Map each record to the `kind` tag stored next to its value.
//! - Encode/decode record values as JSON, dispatching on the tag.
//!
//! # Invariants
//! - Tags are stable wire strings; renaming one breaks existing stores.
//! - Decoding an unknown tag is an error, never a fallback.

use super::application::ApplicationRecord;
use super::datum::Datum;
use super::grid_record::GridRecord;
use serde::{Deserialize, Serialize};

/// Tag stored in the `kind` column of the key-value table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Application,
    Grid,
    Datum,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Grid => "grid",
            Self::Datum => "datum",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "application" => Some(Self::Application),
            "grid" => Some(Self::Grid),
            "datum" => Some(Self::Datum),
            _ => None,
        }
    }
}

/// Any record the store can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Application(ApplicationRecord),
    Grid(GridRecord),
    Datum(Datum),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Application(_) => RecordKind::Application,
            Self::Grid(_) => RecordKind::Grid,
            Self::Datum(_) => RecordKind::Datum,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Application(record) => &record.key,
            Self::Grid(record) => &record.key,
            Self::Datum(record) => &record.key,
        }
    }

    /// Serializes the record payload (without its tag).
    pub fn encode(&self) -> serde_json::Result<String> {
        match self {
            Self::Application(record) => serde_json::to_string(record),
            Self::Grid(record) => serde_json::to_string(record),
            Self::Datum(record) => serde_json::to_string(record),
        }
    }

    /// Deserializes a payload previously produced by [`Record::encode`].
    pub fn decode(kind: RecordKind, value: &str) -> serde_json::Result<Self> {
        Ok(match kind {
            RecordKind::Application => Self::Application(serde_json::from_str(value)?),
            RecordKind::Grid => Self::Grid(serde_json::from_str(value)?),
            RecordKind::Datum => Self::Datum(serde_json::from_str(value)?),
        })
    }
}

impl From<Datum> for Record {
    fn from(value: Datum) -> Self {
        Self::Datum(value)
    }
}

impl From<GridRecord> for Record {
    fn from(value: GridRecord) -> Self {
        Self::Grid(value)
    }
}

impl From<ApplicationRecord> for Record {
    fn from(value: ApplicationRecord) -> Self {
        Self::Application(value)
    }
}
