//! Relation descriptor types.
//!
//! Relation "kind" is a closed tagged variant dispatched by pattern match,
//! not an open class hierarchy: the join planner stays decoupled from any
//! particular ORM's way of modeling relationships.

/// The kind of a declared relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// One row on each side; foreign key lives on the related table.
    OneToOne,
    /// Many related rows; foreign key lives on the related table.
    OneToMany,
    /// Foreign key lives on the owning (current) table.
    ManyToOne,
    /// Many-to-many through a pivot table; joined in two stages.
    ManyToManyPivot,
}

/// Pivot-table keys for a [`RelationKind::ManyToManyPivot`] relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotKeys {
    /// Physical pivot table name.
    pub table: String,
    /// Pivot column referencing the owning entity.
    pub owner_key: String,
    /// Pivot column referencing the related entity.
    pub related_key: String,
}

/// A static filter condition attached to a relation, appended verbatim as
/// an extra AND term on every join the relation produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraCondition {
    /// Column reference, bare or `table.column`.
    pub column: String,
    pub operator: String,
    /// Rendered as a SQL literal (numbers bare, strings quoted).
    pub value: String,
}

/// Everything the join planner needs to know about one declared relation.
///
/// Immutable per relation name; owned by the metadata provider. Key
/// columns may be bare (`user_id`) or table-qualified (`agents.user_id`);
/// anything with more than one dot is rejected as malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDescriptor {
    pub kind: RelationKind,
    /// Entity name the relation points at.
    pub related_entity: String,
    /// Physical table of the related entity.
    pub related_table: String,
    /// Key column on the owning side.
    pub owner_key: String,
    /// Key column on the foreign side.
    pub foreign_key: String,
    /// Pivot keys; required when `kind` is `ManyToManyPivot`.
    pub pivot: Option<PivotKeys>,
    pub conditions: Vec<ExtraCondition>,
}

impl RelationDescriptor {
    fn new(kind: RelationKind, related_entity: &str, related_table: &str) -> Self {
        RelationDescriptor {
            kind,
            related_entity: related_entity.into(),
            related_table: related_table.into(),
            owner_key: "id".into(),
            foreign_key: String::new(),
            pivot: None,
            conditions: Vec::new(),
        }
    }

    /// To-one relation whose foreign key lives on the current table
    /// (`tickets.agent_id` referencing `agents.id`).
    pub fn many_to_one(related_entity: &str, related_table: &str, foreign_key: &str) -> Self {
        let mut rel = Self::new(RelationKind::ManyToOne, related_entity, related_table);
        rel.foreign_key = foreign_key.into();
        rel
    }

    /// To-one relation whose foreign key lives on the related table.
    pub fn one_to_one(related_entity: &str, related_table: &str, foreign_key: &str) -> Self {
        let mut rel = Self::new(RelationKind::OneToOne, related_entity, related_table);
        rel.foreign_key = foreign_key.into();
        rel
    }

    /// To-many relation whose foreign key lives on the related table.
    pub fn one_to_many(related_entity: &str, related_table: &str, foreign_key: &str) -> Self {
        let mut rel = Self::new(RelationKind::OneToMany, related_entity, related_table);
        rel.foreign_key = foreign_key.into();
        rel
    }

    /// Many-to-many relation through a pivot table.
    pub fn many_to_many(
        related_entity: &str,
        related_table: &str,
        pivot_table: &str,
        pivot_owner_key: &str,
        pivot_related_key: &str,
    ) -> Self {
        let mut rel = Self::new(RelationKind::ManyToManyPivot, related_entity, related_table);
        rel.pivot = Some(PivotKeys {
            table: pivot_table.into(),
            owner_key: pivot_owner_key.into(),
            related_key: pivot_related_key.into(),
        });
        rel
    }

    /// Override the owner-side key column (defaults to `id`).
    pub fn with_owner_key(mut self, owner_key: &str) -> Self {
        self.owner_key = owner_key.into();
        self
    }

    /// Attach a static filter condition to the relation.
    pub fn with_condition(mut self, column: &str, operator: &str, value: &str) -> Self {
        self.conditions.push(ExtraCondition {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        });
        self
    }
}
