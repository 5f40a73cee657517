//! The query orchestrator.
//!
//! [`QueryCompiler`] owns one compilation pass: it normalizes the FROM
//! clause, walks the five clause lists through a [`ClauseCompiler`]
//! sharing a single [`JoinContext`], and appends the planned joins to the
//! query. The input [`Query`] is rewritten in place; compiling the result
//! again would treat already-quoted fragments as plain text, so callers
//! compile each query exactly once.

use crate::compile::clause::{ClauseCompiler, ClauseKind};
use crate::config::Settings;
use crate::error::CompileResult;
use crate::join::planner::JoinContext;
use crate::metadata::MetadataProvider;
use crate::parse::path;
use crate::sql::dialect::Dialect;
use crate::sql::query::Query;

/// Compiles relationship-path queries against one base entity.
pub struct QueryCompiler<'a, P: MetadataProvider> {
    provider: &'a P,
    settings: &'a Settings,
    dialect: Dialect,
    base_entity: String,
}

impl<'a, P: MetadataProvider> QueryCompiler<'a, P> {
    pub fn new(
        provider: &'a P,
        settings: &'a Settings,
        dialect: Dialect,
        base_entity: &str,
    ) -> Self {
        QueryCompiler {
            provider,
            settings,
            dialect,
            base_entity: base_entity.to_string(),
        }
    }

    /// Compile `query` in place: resolve every relationship path, append
    /// the planned joins, and normalize FROM to `table AS alias`.
    pub fn compile(&self, query: &mut Query) -> CompileResult<()> {
        let mut ctx = JoinContext::new(self.provider, self.settings, self.dialect, &self.base_entity)?;

        // A caller-written FROM alias (`users as u`) is pinned before any
        // sequential allocation so generated aliases skip it.
        let (from_table, from_alias) = path::split_alias(&query.from);
        if let Some(alias) = &from_alias {
            ctx.set_base_alias(alias);
        }
        let table = if from_table.is_empty() {
            ctx.base_table().to_string()
        } else {
            from_table
        };
        let base_alias = ctx.base_alias();
        query.from = format!(
            "{} AS {}",
            self.dialect.quote_identifier(&table),
            self.dialect.quote_identifier(&base_alias)
        );

        {
            let mut compiler = ClauseCompiler::new(&mut ctx);
            let passes: [(ClauseKind, &mut Vec<_>); 5] = [
                (ClauseKind::Select, &mut query.columns),
                (ClauseKind::Where, &mut query.wheres),
                (ClauseKind::Having, &mut query.havings),
                (ClauseKind::GroupBy, &mut query.groups),
                (ClauseKind::OrderBy, &mut query.orders),
            ];
            for (kind, entries) in passes {
                compiler.compile_entries(kind, entries)?;
            }
        }

        query.joins.extend(ctx.take_joins());

        if self.settings.debug {
            for entry in ctx.debug_log() {
                log::debug!(
                    "join [{}] {} {} AS {}",
                    entry.chain_key,
                    entry.join_type.keyword(),
                    entry.table,
                    entry.alias
                );
            }
            log::debug!("compiled: {}", query.to_sql(self.dialect));
        }
        Ok(())
    }

    /// Compile and render in one step.
    pub fn compile_to_sql(&self, mut query: Query) -> CompileResult<String> {
        self.compile(&mut query)?;
        Ok(query.to_sql(self.dialect))
    }
}
