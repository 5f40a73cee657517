//! Per-clause column rewriting.
//!
//! All five clause kinds share one rewriting core; what differs per kind
//! is the alias and aggregate policy. SELECT columns may carry aliases
//! and get auto-generated ones; WHERE rejects aggregates outright since
//! predicates there run before grouping; GROUP BY does not recognize the
//! `__count` suffix shorthand, so a column that happens to end in a
//! suffix-like name still groups correctly.

use crate::error::{CompileError, CompileResult};
use crate::join::planner::JoinContext;
use crate::metadata::MetadataProvider;
use crate::parse::{grammar, path};
use crate::sql::query::ClauseEntry;

/// Which clause a column expression is being compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    Select,
    Where,
    Having,
    GroupBy,
    OrderBy,
}

impl ClauseKind {
    /// Whether aggregate expressions are legal in this clause.
    fn allows_aggregates(self) -> bool {
        !matches!(self, ClauseKind::Where)
    }

    /// Whether the `__count` suffix shorthand is recognized. GROUP BY is
    /// the exception; there a trailing `__count` is just a column name.
    fn detects_suffix(self) -> bool {
        !matches!(self, ClauseKind::GroupBy)
    }

    /// Whether an explicit ` as alias` survives on aggregate and
    /// COALESCE forms. Plain columns keep aliases in SELECT only.
    fn allows_alias(self) -> bool {
        matches!(
            self,
            ClauseKind::Select | ClauseKind::Having | ClauseKind::OrderBy
        )
    }
}

/// Rewrites clause entries in place, planning joins through the shared
/// [`JoinContext`].
pub struct ClauseCompiler<'c, 'a, P: MetadataProvider> {
    ctx: &'c mut JoinContext<'a, P>,
}

impl<'c, 'a, P: MetadataProvider> ClauseCompiler<'c, 'a, P> {
    pub fn new(ctx: &'c mut JoinContext<'a, P>) -> Self {
        ClauseCompiler { ctx }
    }

    /// Compile every entry of one clause list in place.
    pub fn compile_entries(
        &mut self,
        kind: ClauseKind,
        entries: &mut [ClauseEntry],
    ) -> CompileResult<()> {
        for entry in entries.iter_mut() {
            *entry = self.compile_entry(kind, entry)?;
        }
        Ok(())
    }

    fn compile_entry(&mut self, kind: ClauseKind, entry: &ClauseEntry) -> CompileResult<ClauseEntry> {
        match entry {
            ClauseEntry::Column(expr) => Ok(ClauseEntry::Column(self.compile_column(kind, expr)?)),
            ClauseEntry::Raw(sql) => Ok(ClauseEntry::Raw(self.compile_raw_sql(kind, sql)?)),
            ClauseEntry::Basic {
                column,
                operator,
                value,
            } => Ok(ClauseEntry::Basic {
                column: self.compile_column(kind, column)?,
                operator: operator.clone(),
                value: value.clone(),
            }),
            ClauseEntry::Group(entries) => {
                let mut compiled = entries.clone();
                self.compile_entries(kind, &mut compiled)?;
                Ok(ClauseEntry::Group(compiled))
            }
            ClauseEntry::Ordered { column, dir } => Ok(ClauseEntry::Ordered {
                column: self.compile_column(kind, column)?,
                dir: *dir,
            }),
        }
    }

    /// Rewrite one column expression: aggregates and COALESCE forms are
    /// unwrapped, the path inside is resolved, and aliases re-attached
    /// per the clause's policy.
    pub fn compile_column(&mut self, kind: ClauseKind, raw: &str) -> CompileResult<String> {
        let (expression, alias) = path::split_alias(raw);

        if let Some(agg) = grammar::parse_aggregate(&expression, kind.detects_suffix()) {
            if !kind.allows_aggregates() {
                return Err(CompileError::AggregateNotAllowed {
                    expression: raw.trim().to_string(),
                });
            }
            return self.compile_aggregate(kind, &agg, alias);
        }

        if let Some(coalesce) = grammar::parse_coalesce(&expression) {
            return self.compile_coalesce(kind, &coalesce, alias);
        }

        let resolved = self.ctx.resolve_column(&expression)?;
        Ok(self.append_alias(kind, resolved.sql, alias, resolved.inferred_alias))
    }

    /// Rewrite a raw SQL fragment. Only the closed set of shapes the
    /// grammar recognizes is touched; anything else passes through
    /// verbatim, placeholders included.
    pub fn compile_raw_sql(&mut self, kind: ClauseKind, sql: &str) -> CompileResult<String> {
        let trimmed = sql.trim();

        if let Some(agg) = grammar::parse_aggregate(trimmed, kind.detects_suffix()) {
            if grammar::is_path_reference(&agg.inner) {
                if !kind.allows_aggregates() {
                    return Err(CompileError::AggregateNotAllowed {
                        expression: trimmed.to_string(),
                    });
                }
                return self.compile_aggregate(kind, &agg, None);
            }
        }

        if let Some(coalesce) = grammar::parse_coalesce(trimmed) {
            if coalesce.args.iter().any(|arg| grammar::is_path_reference(arg)) {
                return self.compile_coalesce(kind, &coalesce, None);
            }
        }

        if let Some(bitwise) = grammar::parse_bitwise(trimmed) {
            if grammar::is_path_reference(&bitwise.left) {
                let left = self.ctx.resolve_column(&bitwise.left)?;
                return Ok(format!("{} {} {}", left.sql, bitwise.operator, bitwise.rest));
            }
        }

        if grammar::is_path_reference(trimmed) {
            return Ok(self.ctx.resolve_column(trimmed)?.sql);
        }

        Ok(sql.to_string())
    }

    fn compile_aggregate(
        &mut self,
        kind: ClauseKind,
        agg: &grammar::Aggregate,
        outer_alias: Option<String>,
    ) -> CompileResult<String> {
        let inner = self.ctx.resolve_column(&agg.inner)?;
        let mut sql = format!("{}({})", agg.function, inner.sql);

        let alias = outer_alias.or_else(|| agg.alias.clone());
        match alias {
            Some(alias) if kind.allows_alias() => {
                sql.push_str(" AS ");
                sql.push_str(&self.ctx.dialect().quote_identifier(&alias));
            }
            None if kind == ClauseKind::Select && agg.trailing.is_empty() => {
                let alias = grammar::default_aggregate_alias(&agg.function, &inner.sql);
                sql.push_str(" AS ");
                sql.push_str(&self.ctx.dialect().quote_identifier(&alias));
            }
            _ => {}
        }

        if !agg.trailing.is_empty() {
            sql.push(' ');
            sql.push_str(&agg.trailing);
        }
        Ok(sql)
    }

    fn compile_coalesce(
        &mut self,
        kind: ClauseKind,
        coalesce: &grammar::Coalesce,
        outer_alias: Option<String>,
    ) -> CompileResult<String> {
        let mut args = Vec::with_capacity(coalesce.args.len());
        for arg in &coalesce.args {
            if grammar::is_path_reference(arg) {
                args.push(self.ctx.resolve_column(arg)?.sql);
            } else {
                args.push(arg.clone());
            }
        }
        let mut sql = format!("COALESCE({})", args.join(", "));

        if let Some(alias) = outer_alias.or_else(|| coalesce.alias.clone()) {
            if kind.allows_alias() {
                sql.push_str(" AS ");
                sql.push_str(&self.ctx.dialect().quote_identifier(&alias));
            }
        }

        if !coalesce.trailing.is_empty() {
            sql.push(' ');
            sql.push_str(&coalesce.trailing);
        }
        Ok(sql)
    }

    fn append_alias(
        &self,
        kind: ClauseKind,
        sql: String,
        explicit: Option<String>,
        inferred: Option<String>,
    ) -> String {
        if kind != ClauseKind::Select {
            return sql;
        }
        if let Some(alias) = explicit.or(inferred) {
            return format!("{} AS {}", sql, self.ctx.dialect().quote_identifier(&alias));
        }
        sql
    }
}
