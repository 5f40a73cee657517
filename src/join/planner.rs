//! Chain resolution and join planning.
//!
//! [`JoinContext`] is the per-compilation state: the alias map, the set of
//! chains already materialized as JOINs, and the pending join list. It is
//! created fresh for each query compilation and discarded afterward, so
//! concurrent compilations of distinct queries never share state.
//!
//! Walking a chain emits one JOIN per previously-unseen chain key - two
//! for a pivot hop - and memoizes the alias so every later reference to
//! the same chain reuses it.

use std::collections::HashSet;
use std::mem;

use crate::config::Settings;
use crate::error::{CompileError, CompileResult};
use crate::join::alias::AliasManager;
use crate::metadata::{ExtraCondition, MetadataProvider, RelationDescriptor, RelationKind};
use crate::parse::path::{self, PathSegment, CHAIN_DELIMITER};
use crate::sql::dialect::Dialect;
use crate::sql::query::{JoinClause, JoinCondition, JoinType};

/// One record in the join trace: what was joined, as what, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinTraceEntry {
    pub chain_key: String,
    pub table: String,
    pub alias: String,
    pub join_type: JoinType,
    pub conditions: Vec<JoinCondition>,
}

/// A fully-qualified column produced by chain resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    /// The qualified SQL fragment, e.g. `"B"."id"`.
    pub sql: String,
    /// Auto-generated alias when the field was inferred from a pure
    /// chain expression; `None` otherwise.
    pub inferred_alias: Option<String>,
}

/// Per-compilation join state and chain resolution.
#[derive(Debug)]
pub struct JoinContext<'a, P: MetadataProvider> {
    provider: &'a P,
    settings: &'a Settings,
    dialect: Dialect,
    base_entity: String,
    base_table: String,
    aliases: AliasManager,
    joined: HashSet<String>,
    joins: Vec<JoinClause>,
    trace: Vec<JoinTraceEntry>,
}

impl<'a, P: MetadataProvider> JoinContext<'a, P> {
    pub fn new(
        provider: &'a P,
        settings: &'a Settings,
        dialect: Dialect,
        base_entity: &str,
    ) -> CompileResult<Self> {
        let base_table = provider
            .base_table(base_entity)
            .ok_or_else(|| CompileError::UnknownEntity {
                entity: base_entity.to_string(),
            })?
            .to_string();
        Ok(JoinContext {
            provider,
            settings,
            dialect,
            base_entity: base_entity.to_string(),
            base_table,
            aliases: AliasManager::new(settings.use_simple_aliases),
            joined: HashSet::new(),
            joins: Vec::new(),
            trace: Vec::new(),
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    pub fn base_table(&self) -> &str {
        &self.base_table
    }

    /// The base alias, allocating it on first use. The base table name is
    /// both the alias-map key and the fallback alias.
    pub fn base_alias(&mut self) -> String {
        let overrides = self.provider.alias_overrides(&self.base_entity);
        let table = self.base_table.clone();
        self.aliases
            .resolve_model_alias(overrides, &table, Some(table.as_str()))
    }

    /// Pin the base alias (e.g. one the caller wrote into the FROM
    /// clause) before any allocation happens.
    pub fn set_base_alias(&mut self, alias: &str) {
        let table = self.base_table.clone();
        self.aliases.set_alias(&table, alias);
    }

    /// Joins planned so far, draining the pending list.
    pub fn take_joins(&mut self) -> Vec<JoinClause> {
        mem::take(&mut self.joins)
    }

    /// The join trace accumulated during this compilation.
    pub fn debug_log(&self) -> &[JoinTraceEntry] {
        &self.trace
    }

    /// Resolve a column expression (alias already stripped) into a
    /// fully-qualified SQL fragment, planning joins as needed.
    pub fn resolve_column(&mut self, expression: &str) -> CompileResult<ResolvedColumn> {
        let base_table = self.base_table.clone();
        let mut parsed =
            path::parse_column(expression, Some(base_table.as_str()), self.settings.join_type);

        let mut inferred_alias = None;
        let field = match parsed.field.take() {
            Some(field) => field,
            None => self.infer_field(&mut parsed.chain, &mut inferred_alias)?,
        };

        if parsed.chain.is_empty() {
            let sql = self.base_column_sql(&field);
            return Ok(ResolvedColumn { sql, inferred_alias });
        }

        let alias = self.resolve_chain(&parsed.chain)?;
        Ok(ResolvedColumn {
            sql: self.dialect.qualify(&alias, &field),
            inferred_alias,
        })
    }

    /// Walk a chain, emitting or reusing one join per segment (two for a
    /// pivot hop), and return the alias of the final joined entity.
    pub fn resolve_chain(&mut self, chain: &[PathSegment]) -> CompileResult<String> {
        let provider = self.provider;
        let mut entity = self.base_entity.clone();
        let mut alias = self.base_alias();
        let mut key_parts: Vec<&str> = Vec::with_capacity(chain.len());

        for segment in chain {
            key_parts.push(&segment.relation);
            let chain_key = key_parts.join(CHAIN_DELIMITER);

            let relation = provider.relation(&entity, &segment.relation).ok_or_else(|| {
                CompileError::InvalidRelation {
                    entity: entity.clone(),
                    relation: segment.relation.clone(),
                }
            })?;

            if self.joined.contains(&chain_key) {
                alias = self.aliases.get_alias(&chain_key, Some(alias.as_str()));
            } else {
                alias = self.plan_hop(&entity, &alias, &chain_key, segment, relation)?;
                self.joined.insert(chain_key);
            }
            entity = relation.related_entity.clone();
        }

        Ok(alias)
    }

    /// Infer the terminal field for a pure chain expression.
    ///
    /// The last segment is popped and re-checked: if it names a relation
    /// in its context, it stays in the chain and the field becomes the
    /// related entity's identity column (with an auto-alias of the full
    /// chain key); otherwise it is reinterpreted as a literal field name.
    /// Interior lookup failures still propagate.
    fn infer_field(
        &mut self,
        chain: &mut Vec<PathSegment>,
        inferred_alias: &mut Option<String>,
    ) -> CompileResult<String> {
        let provider = self.provider;
        let last = match chain.pop() {
            Some(last) => last,
            None => return Ok(String::new()),
        };

        let mut entity = self.base_entity.clone();
        for segment in chain.iter() {
            let relation = provider.relation(&entity, &segment.relation).ok_or_else(|| {
                CompileError::InvalidRelation {
                    entity: entity.clone(),
                    relation: segment.relation.clone(),
                }
            })?;
            entity = relation.related_entity.clone();
        }

        match provider.relation(&entity, &last.relation) {
            Some(relation) => {
                let field = provider
                    .identity_column(&relation.related_entity)
                    .ok_or_else(|| CompileError::UnknownEntity {
                        entity: relation.related_entity.clone(),
                    })?
                    .to_string();
                chain.push(last);
                if self.settings.infer_aliases {
                    let key = chain
                        .iter()
                        .map(|s| s.relation.as_str())
                        .collect::<Vec<_>>()
                        .join(CHAIN_DELIMITER);
                    *inferred_alias = Some(key);
                }
                Ok(field)
            }
            None => Ok(last.relation),
        }
    }

    /// Qualify an unqualified field: base-table columns get the base
    /// alias prefix, anything else is quoted as-is.
    fn base_column_sql(&mut self, field: &str) -> String {
        if self.provider.table_has_column(&self.base_table, field) {
            let base = self.base_alias();
            self.dialect.qualify(&base, field)
        } else {
            self.dialect.quote_identifier(field)
        }
    }

    fn plan_hop(
        &mut self,
        entity: &str,
        current_alias: &str,
        chain_key: &str,
        segment: &PathSegment,
        relation: &RelationDescriptor,
    ) -> CompileResult<String> {
        match relation.kind {
            RelationKind::ManyToManyPivot => {
                self.plan_pivot_hop(entity, current_alias, chain_key, segment, relation)
            }
            _ => self.plan_normal_hop(entity, current_alias, chain_key, segment, relation),
        }
    }

    /// Plan a single-join hop.
    ///
    /// The key-expression direction depends on where the foreign key
    /// lives: on the current table for ManyToOne, on the joined table for
    /// OneToOne/OneToMany. Inverting this produces syntactically valid
    /// but wrong SQL, so it is the one rule the tests guard hardest.
    fn plan_normal_hop(
        &mut self,
        entity: &str,
        current_alias: &str,
        chain_key: &str,
        segment: &PathSegment,
        relation: &RelationDescriptor,
    ) -> CompileResult<String> {
        let overrides = self.provider.alias_overrides(entity);
        let join_alias =
            self.aliases
                .resolve_model_alias(overrides, chain_key, Some(segment.relation.as_str()));

        let foreign = key_column(&relation.foreign_key)?;
        let owner = key_column(&relation.owner_key)?;

        let (left, right) = match relation.kind {
            RelationKind::ManyToOne => (
                self.dialect.qualify(current_alias, foreign),
                self.dialect.qualify(&join_alias, owner),
            ),
            RelationKind::OneToOne | RelationKind::OneToMany => (
                self.dialect.qualify(&join_alias, foreign),
                self.dialect.qualify(current_alias, owner),
            ),
            RelationKind::ManyToManyPivot => {
                return Err(CompileError::UnsupportedRelationKind {
                    entity: entity.to_string(),
                    relation: segment.relation.clone(),
                })
            }
        };

        let mut conditions = vec![JoinCondition {
            left,
            operator: "=".into(),
            right,
        }];
        conditions.extend(self.extra_conditions(&relation.conditions));

        self.push_join(
            segment.join_type,
            &relation.related_table,
            &join_alias,
            conditions,
            chain_key,
        );
        Ok(join_alias)
    }

    /// Plan a pivot hop: two physical joins for one logical chain step.
    ///
    /// Stage 1 joins the pivot table against the current entity's
    /// identity column; stage 2 joins the related table against the
    /// pivot's related key. The bare chain key is then pointed at the
    /// stage-2 alias so later references land on the related table, never
    /// the pivot.
    fn plan_pivot_hop(
        &mut self,
        entity: &str,
        current_alias: &str,
        chain_key: &str,
        segment: &PathSegment,
        relation: &RelationDescriptor,
    ) -> CompileResult<String> {
        let provider = self.provider;
        let pivot = relation
            .pivot
            .as_ref()
            .ok_or_else(|| CompileError::UnsupportedRelationKind {
                entity: entity.to_string(),
                relation: segment.relation.clone(),
            })?;
        let overrides = provider.alias_overrides(entity);

        // Stage 1: current entity -> pivot table.
        let pivot_key = format!("{}_pivot", chain_key);
        let pivot_alias =
            self.aliases
                .resolve_model_alias(overrides, &pivot_key, Some(pivot.table.as_str()));
        let base_identity =
            provider
                .identity_column(entity)
                .ok_or_else(|| CompileError::UnknownEntity {
                    entity: entity.to_string(),
                })?;
        let mut stage1 = vec![JoinCondition {
            left: self.dialect.qualify(current_alias, base_identity),
            operator: "=".into(),
            right: self
                .dialect
                .qualify(&pivot_alias, key_column(&pivot.owner_key)?),
        }];
        stage1.extend(self.extra_conditions(&relation.conditions));
        self.push_join(
            segment.join_type,
            &pivot.table,
            &pivot_alias,
            stage1,
            &pivot_key,
        );

        // Stage 2: pivot table -> related entity.
        let related_key = format!("{}_related", chain_key);
        let related_alias = self.aliases.resolve_model_alias(
            overrides,
            &related_key,
            Some(relation.related_table.as_str()),
        );
        let related_identity = provider
            .identity_column(&relation.related_entity)
            .ok_or_else(|| CompileError::UnknownEntity {
                entity: relation.related_entity.clone(),
            })?;
        let mut stage2 = vec![JoinCondition {
            left: self
                .dialect
                .qualify(&pivot_alias, key_column(&pivot.related_key)?),
            operator: "=".into(),
            right: self.dialect.qualify(&related_alias, related_identity),
        }];
        stage2.extend(self.extra_conditions(&relation.conditions));
        self.push_join(
            segment.join_type,
            &relation.related_table,
            &related_alias,
            stage2,
            &related_key,
        );

        self.aliases.set_alias(chain_key, &related_alias);
        Ok(related_alias)
    }

    fn extra_conditions(&self, conditions: &[ExtraCondition]) -> Vec<JoinCondition> {
        conditions
            .iter()
            .map(|c| JoinCondition {
                left: self.dialect.quote_reference(&c.column),
                operator: c.operator.clone(),
                right: self.dialect.literal(&c.value),
            })
            .collect()
    }

    fn push_join(
        &mut self,
        join_type: JoinType,
        table: &str,
        alias: &str,
        conditions: Vec<JoinCondition>,
        chain_key: &str,
    ) {
        self.trace.push(JoinTraceEntry {
            chain_key: chain_key.to_string(),
            table: table.to_string(),
            alias: alias.to_string(),
            join_type,
            conditions: conditions.clone(),
        });
        self.joins.push(JoinClause {
            join_type,
            table: table.to_string(),
            alias: alias.to_string(),
            conditions,
        });
    }
}

/// Extract the column part of a key reference, accepting `column` or
/// `table.column`. Anything else is malformed metadata.
fn key_column(key: &str) -> CompileResult<&str> {
    let parts: Vec<&str> = key.split('.').collect();
    if key.is_empty() || parts.len() > 2 || parts.iter().any(|p| p.is_empty()) {
        return Err(CompileError::MalformedKeyFormat {
            key: key.to_string(),
        });
    }
    Ok(parts[parts.len() - 1])
}
