//! Join planning: alias allocation and chain resolution.

pub mod alias;
pub mod planner;

pub use alias::AliasManager;
pub use planner::{JoinContext, JoinTraceEntry, ResolvedColumn};
