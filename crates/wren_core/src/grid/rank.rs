//! Rank-based column synthesis.
//!
//! # Responsibility
//! - Order active datums against a reference datum through an injected
//!   similarity oracle, or by self-relationship score for a null search.
//! - Write the ranking as a column: reference on the home row, scored
//!   datums below it, one empty row, then unscored datums.
//!
//! # Invariants
//! - Scored datums sort by distance ascending (null search: self-score
//!   descending); equal keys keep encounter order.
//! - Unscored datums sort by `last_changed` ascending, also stably.
//! - A pair the oracle cannot score never aborts the ranking.

use super::event::TransformReport;
use super::{Grid, GridError, GridResult};
use crate::model::grid_record::RelationshipTable;
use crate::model::DatumKey;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Viewport cell the reference clip is scrolled to after a ranking.
const RANKED_REFERENCE_ANCHOR: (i64, i64) = (1, 1);

/// The oracle has no representation for one of the two content values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unscorable;

impl Display for Unscorable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "content pair cannot be scored")
    }
}

impl Error for Unscorable {}

/// Distance between content values; lower means more similar.
pub trait SimilarityOracle {
    fn distance(&self, source: &str, candidate: &str) -> Result<f64, Unscorable>;
}

/// Oracle backed by an explicit symmetric table of pair distances.
///
/// A known term is at distance `0` from itself; any pair not in the table is
/// unscorable.
#[derive(Debug, Clone, Default)]
pub struct DistanceTable {
    distances: HashMap<(String, String), f64>,
}

impl DistanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `distance` for both orderings of the pair.
    pub fn insert(&mut self, a: &str, b: &str, distance: f64) {
        self.distances
            .insert((a.to_string(), b.to_string()), distance);
        self.distances
            .insert((b.to_string(), a.to_string()), distance);
    }

    pub fn with(mut self, a: &str, b: &str, distance: f64) -> Self {
        self.insert(a, b, distance);
        self
    }

    fn knows(&self, term: &str) -> bool {
        self.distances.keys().any(|(a, _)| a == term)
    }
}

impl SimilarityOracle for DistanceTable {
    fn distance(&self, source: &str, candidate: &str) -> Result<f64, Unscorable> {
        if let Some(distance) = self
            .distances
            .get(&(source.to_string(), candidate.to_string()))
        {
            return Ok(*distance);
        }
        if source == candidate && self.knows(source) {
            return Ok(0.0);
        }
        Err(Unscorable)
    }
}

/// One active datum offered to the ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankCandidate {
    pub key: DatumKey,
    pub content: String,
    pub last_changed: i64,
}

/// Ranked datum keys, split by whether a score was available.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ranking {
    pub scored: Vec<DatumKey>,
    pub unscored: Vec<DatumKey>,
}

/// Ranks candidates by oracle distance from `reference_content`.
///
/// The candidate whose key is `reference_key` is skipped. Non-finite or
/// negative distances count as unscored.
pub fn rank_by_distance(
    reference_key: &str,
    reference_content: &str,
    candidates: &[RankCandidate],
    oracle: &dyn SimilarityOracle,
) -> Ranking {
    let mut scored: Vec<(f64, &RankCandidate)> = Vec::new();
    let mut unscored: Vec<&RankCandidate> = Vec::new();

    for candidate in candidates {
        if candidate.key == reference_key {
            continue;
        }
        match oracle.distance(reference_content, &candidate.content) {
            Ok(distance) if distance.is_finite() && distance >= 0.0 => {
                scored.push((distance, candidate));
            }
            _ => unscored.push(candidate),
        }
    }

    scored.sort_by(|(left, _), (right, _)| left.total_cmp(right));
    finish(scored, unscored)
}

/// Ranks candidates by their self-relationship score, highest first.
///
/// Absent or non-numeric self-scores count as unscored.
pub fn rank_by_self_score(
    candidates: &[RankCandidate],
    relationships: &RelationshipTable,
) -> Ranking {
    let mut scored: Vec<(f64, &RankCandidate)> = Vec::new();
    let mut unscored: Vec<&RankCandidate> = Vec::new();

    for candidate in candidates {
        let score = relationships
            .get(&candidate.key)
            .and_then(|row| row.get(&candidate.key))
            .and_then(|text| text.trim().parse::<f64>().ok())
            .filter(|score| score.is_finite());
        match score {
            Some(score) => scored.push((score, candidate)),
            None => unscored.push(candidate),
        }
    }

    scored.sort_by(|(left, _), (right, _)| right.total_cmp(left));
    finish(scored, unscored)
}

fn finish(scored: Vec<(f64, &RankCandidate)>, mut unscored: Vec<&RankCandidate>) -> Ranking {
    unscored.sort_by_key(|candidate| candidate.last_changed);
    Ranking {
        scored: scored
            .into_iter()
            .map(|(_, candidate)| candidate.key.clone())
            .collect(),
        unscored: unscored
            .into_iter()
            .map(|candidate| candidate.key.clone())
            .collect(),
    }
}

/// How the target column is prepared before the ranking is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnPlacement {
    /// Open a fresh column with `insert_column`, pushing the old one left.
    #[default]
    Insert,
    /// Empty the target column and reuse it.
    InPlace,
}

impl Grid {
    /// Writes `ranking` into absolute column `column`.
    ///
    /// With a reference datum it sits on the home row and the ranking
    /// starts on row 1; without one row 0 stays empty. Scored keys come
    /// first, then one empty row, then unscored keys. Afterwards the
    /// selection cursor sits on absolute `(column, 0)`, scrolled to viewport
    /// `(1, 1)` (clamped to the viewport), and the marker cursor on the same
    /// cell.
    pub fn write_ranked_column(
        &mut self,
        column: i64,
        reference: Option<&str>,
        ranking: &Ranking,
        placement: ColumnPlacement,
    ) -> GridResult<TransformReport> {
        if let Some(inactive) = reference
            .into_iter()
            .chain(ranking.scored.iter().map(String::as_str))
            .chain(ranking.unscored.iter().map(String::as_str))
            .find(|key| !self.is_active(key))
        {
            return Err(GridError::InactiveDatum(inactive.to_string()));
        }

        let report = match placement {
            ColumnPlacement::Insert => self.insert_column(column)?,
            ColumnPlacement::InPlace => self.clear_column(column),
        };

        if let Some(reference) = reference {
            self.place_clip(reference, column, 0, 0)?;
        }
        let slots = ranking
            .scored
            .iter()
            .map(Some)
            .chain(std::iter::once(None))
            .chain(ranking.unscored.iter().map(Some));
        for (row, datum_key) in (1_i64..).zip(slots) {
            let Some(datum_key) = datum_key else {
                continue;
            };
            self.place_clip(datum_key, column, row, 0)?;
        }

        let (screen_x, home_row) = (column - self.x_offset, self.home_row_screen_y());
        self.set_main_cursor(screen_x, home_row);
        self.set_secondary_cursor(column, 0);
        let (anchor_x, anchor_y) = RANKED_REFERENCE_ANCHOR;
        let (width, height) = self.viewport();
        self.scroll_cursor_to(anchor_x.min(width - 1), anchor_y.min(height - 1));
        Ok(report)
    }
}
