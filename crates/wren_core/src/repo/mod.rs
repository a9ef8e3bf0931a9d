//! Record store abstraction and persistence implementation.
//!
//! # Responsibility
//! - Define the keyed load/save contract the grid engine persists through.
//! - Isolate SQLite query details from session orchestration.
//!
//! # Invariants
//! - `load` of a missing key is a semantic `NotFound`, not a transport error.
//! - The stored `kind` tag always matches the decoded record variant.

pub mod record_store;
