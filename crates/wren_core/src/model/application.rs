//! Application root record.

use super::{GridKey, RecordKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Top-level record listing known grids and the current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub key: RecordKey,
    pub grids: BTreeSet<GridKey>,
    pub current_grid: Option<GridKey>,
}

impl ApplicationRecord {
    pub fn new(key: impl Into<RecordKey>) -> Self {
        Self {
            key: key.into(),
            grids: BTreeSet::new(),
            current_grid: None,
        }
    }

    /// Registers `grid_key` and makes it current when no grid is current yet.
    ///
    /// Returns whether the record changed.
    pub fn adopt_grid(&mut self, grid_key: &str) -> bool {
        let mut changed = self.grids.insert(grid_key.to_string());
        if self.current_grid.is_none() {
            self.current_grid = Some(grid_key.to_string());
            changed = true;
        }
        changed
    }
}
