//! # Autojoin
//!
//! A relationship-path query compiler: column expressions that reference
//! related entities (`agent__departments.name`, `agent.departments.name`)
//! are rewritten into fully-qualified, deduplicated JOIN SQL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Query (clause lists with path expressions)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [parse]
//! ┌─────────────────────────────────────────────────────────┐
//! │    Chains + fields + aliases (+ aggregate/COALESCE/      │
//! │              bitwise micro-grammars)                     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [join planner + metadata]
//! ┌─────────────────────────────────────────────────────────┐
//! │      Deduplicated JOIN clauses + stable aliases          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [clause compilers]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Rewritten Query (qualified columns, joins)        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use autojoin::prelude::*;
//!
//! let mut catalog = SchemaCatalog::new();
//! catalog.register(
//!     EntityDef::new("User", "users")
//!         .with_columns(["id", "name"])
//!         .with_relation(
//!             "agent",
//!             RelationDescriptor::one_to_one("Agent", "agents", "user_id"),
//!         ),
//! );
//! catalog.register(EntityDef::new("Agent", "agents").with_columns(["id", "user_id"]));
//!
//! let settings = Settings::default();
//! let compiler = QueryCompiler::new(&catalog, &settings, Dialect::Ansi, "User");
//! let sql = compiler
//!     .compile_to_sql(Query::table("users").select(["name", "agent.id as agent_id"]))
//!     .unwrap();
//! assert!(sql.contains("LEFT JOIN \"agents\" AS \"B\""));
//! ```

pub mod compile;
pub mod config;
pub mod error;
pub mod join;
pub mod metadata;
pub mod parse;
pub mod sql;

// Re-export SQL submodules at crate level.
pub use sql::dialect;
pub use sql::query;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compile::{ClauseCompiler, ClauseKind, QueryCompiler};
    pub use crate::config::Settings;
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::error::{CompileError, CompileResult};
    pub use crate::join::{AliasManager, JoinContext};
    pub use crate::metadata::{
        EntityDef, ExtraCondition, MetadataProvider, PivotKeys, RelationDescriptor, RelationKind,
        SchemaCatalog,
    };
    pub use crate::query::{ClauseEntry, JoinClause, JoinType, Query, SortDir};
}

// Also export at crate root for convenience.
pub use compile::QueryCompiler;
pub use config::Settings;
pub use dialect::Dialect;
pub use error::{CompileError, CompileResult};
pub use metadata::{EntityDef, MetadataProvider, RelationDescriptor, SchemaCatalog};
pub use query::{ClauseEntry, JoinType, Query, SortDir};
