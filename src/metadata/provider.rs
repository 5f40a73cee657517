//! MetadataProvider trait definition.
//!
//! The provider abstracts over wherever entity metadata actually lives
//! (an ORM layer, a schema registry, a hand-built catalog). All lookups
//! are synchronous, read-only borrows: compilation performs no I/O, and a
//! provider shared across threads stays safe as long as each thread
//! compiles its own query.

use std::collections::HashMap;

use super::types::RelationDescriptor;

/// Read-only entity metadata lookups consumed by the compiler.
pub trait MetadataProvider {
    /// Look up a declared relation by `(entity, relation name)`.
    ///
    /// `None` surfaces as `InvalidRelation` at non-terminal chain
    /// positions; terminal positions fall back to field inference.
    fn relation(&self, entity: &str, name: &str) -> Option<&RelationDescriptor>;

    /// The identity (primary key) column of an entity.
    fn identity_column(&self, entity: &str) -> Option<&str>;

    /// The physical base table of an entity.
    fn base_table(&self, entity: &str) -> Option<&str>;

    /// Entity-declared alias overrides, keyed by relationship chain key.
    ///
    /// Lets a model pin a human-readable alias (`"agent"` -> `"staff"`)
    /// ahead of automatic allocation.
    fn alias_overrides(&self, entity: &str) -> Option<&HashMap<String, String>>;

    /// Whether `table` declares `column`. Decides if an unqualified field
    /// belongs to the base table and needs the base alias prefix.
    fn table_has_column(&self, table: &str, column: &str) -> bool;
}
