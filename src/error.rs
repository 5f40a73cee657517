//! Compilation errors.
//!
//! Every error here is terminal for the clause entry being compiled:
//! nothing is retried or degraded, the error propagates straight out of
//! the compiler call that detected it.

use thiserror::Error;

/// Errors raised while rewriting a query.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The base entity (or a relation's related entity) is not registered
    /// with the metadata provider.
    #[error("unknown entity: {entity}")]
    UnknownEntity { entity: String },

    /// A chain segment does not name a declared relation on the current
    /// entity. Terminal segments are exempt: the path parser reinterprets
    /// them as field names instead of raising.
    #[error("no relation named '{relation}' on entity '{entity}'")]
    InvalidRelation { entity: String, relation: String },

    /// The relation resolved, but the planner cannot derive key
    /// expressions for it as declared (e.g. a pivot relation with no
    /// pivot keys).
    #[error("cannot plan join keys for relation '{relation}' on entity '{entity}'")]
    UnsupportedRelationKind { entity: String, relation: String },

    /// A key column reference was neither `column` nor `table.column`.
    #[error("malformed key reference '{key}': expected 'column' or 'table.column'")]
    MalformedKeyFormat { key: String },

    /// An aggregate function appeared inside a WHERE-clause column.
    /// WHERE predicates operate on row-level values before aggregation.
    #[error("aggregate expressions are not allowed in WHERE clauses: {expression}")]
    AggregateNotAllowed { expression: String },
}

/// Result alias used throughout the compiler.
pub type CompileResult<T> = Result<T, CompileError>;
