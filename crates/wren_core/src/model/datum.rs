//! Datum domain model.
//!
//! # Responsibility
//! - Define the named content unit placed on grids through clips.
//! - Keep `last_changed` current on every content or name edit.
//!
//! # Invariants
//! - `key` is stable and never reused for another datum.
//! - `parent` is a single-parent link; acyclicity is not enforced here.

use super::{new_key, now_epoch_ms, DatumKey};
use serde::{Deserialize, Serialize};

/// Named unit of text content with an optional hierarchical parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datum {
    pub key: DatumKey,
    pub name: String,
    /// Opaque text content. Also the value handed to the similarity oracle.
    pub content: String,
    /// Unix epoch milliseconds of the last content or name edit.
    pub last_changed: i64,
    pub parent: Option<DatumKey>,
}

impl Datum {
    /// Creates a datum with a generated key, stamped with the current time.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_key(new_key(), name, content)
    }

    /// Creates a datum with a caller-provided key.
    ///
    /// Used for well-known records such as the name counter.
    pub fn with_key(
        key: impl Into<DatumKey>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            content: content.into(),
            last_changed: now_epoch_ms(),
            parent: None,
        }
    }

    /// Replaces content and refreshes `last_changed`.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.last_changed = now_epoch_ms();
    }

    /// Renames the datum and refreshes `last_changed`.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.last_changed = now_epoch_ms();
    }
}
