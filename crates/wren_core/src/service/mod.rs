//! Session and user-facing commands.
//!
//! # Responsibility
//! - Own the record store, datum identity map and live grids.
//! - Turn presentation-level commands into grid engine calls and report
//!   them as `Outcome`s.

pub mod grid_commands;
pub mod outcome;
pub mod rank_commands;
pub mod session;
