//! Core of the Wren spatial note grid.
//! Owns the grid engine invariants and the persisted record model.

pub mod config;
pub mod db;
pub mod grid;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, GridConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use grid::cursor::{ColumnScroll, CursorMove, Direction};
pub use grid::event::{GridEvent, TransformReport};
pub use grid::rank::{ColumnPlacement, DistanceTable, SimilarityOracle, Unscorable};
pub use grid::{Coord, Grid, GridError, GridResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::clip::{Clip, CursorRole};
pub use model::datum::Datum;
pub use model::record::{Record, RecordKind};
pub use repo::record_store::{RecordStore, RepoError, RepoResult, SqliteRecordStore};
pub use service::outcome::Outcome;
pub use service::rank_commands::{RankRequest, RankSource};
pub use service::session::{ServiceError, ServiceResult, Session};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
