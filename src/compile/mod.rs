//! Clause compilation and query orchestration.

pub mod clause;
pub mod query;

pub use clause::{ClauseCompiler, ClauseKind};
pub use query::QueryCompiler;
