//! In-memory schema catalog.
//!
//! `SchemaCatalog` is the bundled [`MetadataProvider`]: entities are
//! registered programmatically with their tables, columns, relations, and
//! alias overrides. Tests build small catalogs inline; embedders can do
//! the same or supply their own provider.

use std::collections::HashMap;

use super::provider::MetadataProvider;
use super::types::RelationDescriptor;

/// One registered entity.
#[derive(Debug, Clone, Default)]
#[must_use = "builders have no effect until registered with a catalog"]
pub struct EntityDef {
    name: String,
    table: String,
    identity: String,
    columns: Vec<String>,
    relations: HashMap<String, RelationDescriptor>,
    alias_overrides: HashMap<String, String>,
}

impl EntityDef {
    pub fn new(name: &str, table: &str) -> Self {
        EntityDef {
            name: name.into(),
            table: table.into(),
            identity: "id".into(),
            ..Default::default()
        }
    }

    /// Override the identity column (defaults to `id`).
    pub fn with_identity(mut self, column: &str) -> Self {
        self.identity = column.into();
        self
    }

    /// Declare the table's columns (used for base-column detection).
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Declare a named relation.
    pub fn with_relation(mut self, name: &str, relation: RelationDescriptor) -> Self {
        self.relations.insert(name.into(), relation);
        self
    }

    /// Pin a custom join alias for a relationship chain key.
    pub fn with_alias(mut self, chain_key: &str, alias: &str) -> Self {
        self.alias_overrides.insert(chain_key.into(), alias.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

/// In-memory metadata provider over registered entities.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    entities: HashMap<String, EntityDef>,
    /// table name -> column set, for `table_has_column`.
    tables: HashMap<String, Vec<String>>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entity: EntityDef) -> &mut Self {
        self.tables
            .entry(entity.table.clone())
            .or_default()
            .extend(entity.columns.iter().cloned());
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    pub fn entity(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }
}

impl MetadataProvider for SchemaCatalog {
    fn relation(&self, entity: &str, name: &str) -> Option<&RelationDescriptor> {
        self.entities.get(entity)?.relations.get(name)
    }

    fn identity_column(&self, entity: &str) -> Option<&str> {
        self.entities.get(entity).map(|e| e.identity.as_str())
    }

    fn base_table(&self, entity: &str) -> Option<&str> {
        self.entities.get(entity).map(|e| e.table.as_str())
    }

    fn alias_overrides(&self, entity: &str) -> Option<&HashMap<String, String>> {
        self.entities.get(entity).map(|e| &e.alias_overrides)
    }

    fn table_has_column(&self, table: &str, column: &str) -> bool {
        self.tables
            .get(table)
            .is_some_and(|columns| columns.iter().any(|c| c == column))
    }
}
