//! Expression parsing.
//!
//! Two small regex-driven grammars, kept deliberately narrow (this is not
//! a SQL parser):
//!
//! - [`path`] - relationship-path column expressions
//!   (`agent__departments.name`, `agent|inner.id as aid`)
//! - [`grammar`] - the closed set of embedded forms the clause compilers
//!   unwrap: aggregates, the `__count` suffix shorthand, `COALESCE(...)`,
//!   and bitwise comparisons

pub mod grammar;
pub mod path;

pub use grammar::{Aggregate, Bitwise, Coalesce};
pub use path::{ParsedColumn, PathSegment};
