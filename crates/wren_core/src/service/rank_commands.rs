//! Ranked-column commands.
//!
//! # Responsibility
//! - Pick the reference datum and target column for a ranking request.
//! - Gather active datums as candidates and hand them to the ranking
//!   functions in `grid::rank`.
//!
//! # Invariants
//! - The target column is the selection cursor's column.
//! - A request with neither a reference clip nor the selection on the home
//!   row changes nothing.

use super::outcome::Outcome;
use super::session::{ServiceResult, Session};
use crate::grid::rank::{
    rank_by_distance, rank_by_self_score, ColumnPlacement, RankCandidate, Ranking,
    SimilarityOracle,
};
use crate::model::DatumKey;
use crate::repo::record_store::RecordStore;
use log::info;

/// Where the reference datum of a ranking comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankSource {
    /// Clip under the selection cursor.
    #[default]
    Selection,
    /// Clip under the marker cursor.
    Marker,
    /// Home-row clip of the selection column.
    HomeRow,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankRequest {
    pub source: RankSource,
    pub placement: ColumnPlacement,
}

impl RankRequest {
    pub fn new(source: RankSource, placement: ColumnPlacement) -> Self {
        Self { source, placement }
    }
}

impl<S: RecordStore> Session<S> {
    /// Builds a column of clips ordered by similarity to the reference datum.
    ///
    /// Without a reference and with the selection on the home row this runs
    /// the null search: active datums ranked by self-relationship score into
    /// a freshly inserted column whose home row stays empty.
    pub fn make_ranked_clips(
        &mut self,
        request: RankRequest,
        oracle: &dyn SimilarityOracle,
    ) -> ServiceResult<Outcome> {
        let (column, _) = self.grid().selection_coords();
        let reference = self.rank_reference(request.source, column);

        let (ranking, placement) = match &reference {
            Some(reference_key) => {
                let candidates = self.rank_candidates()?;
                let content = self.datum(reference_key)?.content.clone();
                let ranking = rank_by_distance(reference_key, &content, &candidates, oracle);
                (ranking, request.placement)
            }
            None => {
                let grid = self.grid();
                if grid.main_cursor().y != grid.home_row_screen_y() {
                    return Ok(Outcome::failure("Make Ranked Clips fail - no Clip selected"));
                }
                let candidates = self.rank_candidates()?;
                let ranking = rank_by_self_score(&candidates, self.grid().relationships());
                (ranking, ColumnPlacement::Insert)
            }
        };

        self.write_ranking(column, reference.as_deref(), &ranking, placement)?;
        let label = match &reference {
            Some(reference_key) => self.datum_name(reference_key),
            None => "null search".to_string(),
        };
        Ok(Outcome::success(format!(
            "Make Ranked Clips {label} - {} scored, {} unscored",
            ranking.scored.len(),
            ranking.unscored.len()
        )))
    }

    /// Re-ranks the selection column in place against its home-row clip.
    ///
    /// An empty home row falls through to the null search when the
    /// selection is on the home row, and fails otherwise.
    pub fn refresh_selected_column(
        &mut self,
        oracle: &dyn SimilarityOracle,
    ) -> ServiceResult<Outcome> {
        self.make_ranked_clips(
            RankRequest::new(RankSource::HomeRow, ColumnPlacement::InPlace),
            oracle,
        )
    }

    fn rank_reference(&self, source: RankSource, column: i64) -> Option<DatumKey> {
        let grid = self.grid();
        let clip = match source {
            RankSource::Selection => grid.selection_clip(),
            RankSource::Marker => grid.marker_clip(),
            RankSource::HomeRow => grid.clip_at(column, 0),
        };
        clip.map(|clip| clip.datum_key.clone())
    }

    fn rank_candidates(&mut self) -> ServiceResult<Vec<RankCandidate>> {
        let keys = self.grid().active_datums().to_vec();
        let mut candidates = Vec::with_capacity(keys.len());
        for key in keys {
            let datum = self.datum(&key)?;
            candidates.push(RankCandidate {
                content: datum.content.clone(),
                last_changed: datum.last_changed,
                key,
            });
        }
        Ok(candidates)
    }

    fn write_ranking(
        &mut self,
        column: i64,
        reference: Option<&str>,
        ranking: &Ranking,
        placement: ColumnPlacement,
    ) -> ServiceResult<()> {
        self.grid_mut()
            .write_ranked_column(column, reference, ranking, placement)?;
        self.save_grid()?;
        info!(
            "event=rank_column module=service status=ok column={} scored={} unscored={} null_search={}",
            column,
            ranking.scored.len(),
            ranking.unscored.len(),
            reference.is_none()
        );
        Ok(())
    }
}
