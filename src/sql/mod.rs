//! SQL surface: dialect abstraction and the rewritable query artifact.
//!
//! - [`dialect`] - identifier/literal quoting per target database
//! - [`query`] - the clause lists the compiler rewrites in place

pub mod dialect;
pub mod query;

pub use dialect::{Dialect, SqlDialect};
pub use query::{ClauseEntry, JoinClause, JoinCondition, JoinType, Query, SortDir};
