//! Entity metadata: relation descriptors, the provider boundary, and an
//! in-memory catalog implementation.
//!
//! The compiler never inspects a database. Everything it knows about
//! entities, tables, and relationships comes through the synchronous
//! [`MetadataProvider`] trait; [`SchemaCatalog`] is the bundled in-memory
//! implementation used by tests and embedders.

pub mod catalog;
pub mod provider;
pub mod types;

pub use catalog::{EntityDef, SchemaCatalog};
pub use provider::MetadataProvider;
pub use types::{ExtraCondition, PivotKeys, RelationDescriptor, RelationKind};
