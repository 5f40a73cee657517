//! The rewritable query artifact.
//!
//! A [`Query`] carries an ordered FROM value plus the five clause lists the
//! compiler rewrites in place (select, where, having, group-by, order-by)
//! and the join list it appends to. Clause entries start out as raw strings
//! or structured records; after compilation every column reference inside
//! them is fully qualified.

use serde::{Deserialize, Serialize};

use super::dialect::Dialect;

// =============================================================================
// Join types
// =============================================================================

/// Join method for one planned hop.
///
/// Anything that is not explicitly `inner` falls back to a LEFT join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    Inner,
    #[default]
    Left,
}

impl JoinType {
    /// Parse a join-type annotation (`inner`/`left`), case-insensitively.
    pub fn parse(s: &str) -> JoinType {
        if s.eq_ignore_ascii_case("inner") {
            JoinType::Inner
        } else {
            JoinType::Left
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
        }
    }
}

/// Sort direction for ORDER BY entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

// =============================================================================
// Join clauses
// =============================================================================

/// One `left = right` condition on a JOIN. Both sides are pre-rendered SQL
/// fragments (already quoted and alias-qualified).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCondition {
    pub left: String,
    pub operator: String,
    pub right: String,
}

/// A planned JOIN clause. Emitted once per chain key, never mutated or
/// removed afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    pub join_type: JoinType,
    /// Unquoted physical table name.
    pub table: String,
    pub alias: String,
    pub conditions: Vec<JoinCondition>,
}

impl JoinClause {
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let on = self
            .conditions
            .iter()
            .map(|c| format!("{} {} {}", c.left, c.operator, c.right))
            .collect::<Vec<_>>()
            .join(" AND ");
        format!(
            "{} {} AS {} ON {}",
            self.join_type.keyword(),
            dialect.quote_identifier(&self.table),
            dialect.quote_identifier(&self.alias),
            on
        )
    }
}

// =============================================================================
// Clause entries
// =============================================================================

/// One entry in a clause list.
///
/// Entries arrive as caller input and leave as compiled SQL: the compiler
/// replaces the column expressions inside each variant with their
/// fully-qualified forms but keeps the variant shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseEntry {
    /// Plain column expression, possibly relationship-qualified
    /// (`agent.id as agent_id`, `agent__departments.name`).
    Column(String),
    /// Pre-built SQL fragment, passed through the raw-SQL grammar
    /// (`COUNT(agent__tickets.id) > ?`, `ticket.flags & ? = 0`).
    Raw(String),
    /// Structured predicate: `column operator value`. The value renders
    /// verbatim, so `?` placeholders survive compilation.
    Basic {
        column: String,
        operator: String,
        value: String,
    },
    /// Nested boolean group; rendered parenthesized, joined with AND.
    Group(Vec<ClauseEntry>),
    /// Column with a sort direction (ORDER BY entries).
    Ordered { column: String, dir: SortDir },
}

impl ClauseEntry {
    /// Render this entry as a SQL fragment.
    pub fn to_sql(&self) -> String {
        match self {
            ClauseEntry::Column(sql) | ClauseEntry::Raw(sql) => sql.clone(),
            ClauseEntry::Basic {
                column,
                operator,
                value,
            } => format!("{} {} {}", column, operator, value),
            ClauseEntry::Group(entries) => {
                let inner = entries
                    .iter()
                    .map(ClauseEntry::to_sql)
                    .collect::<Vec<_>>()
                    .join(" AND ");
                format!("({})", inner)
            }
            ClauseEntry::Ordered { column, dir } => {
                format!("{} {}", column, dir.keyword())
            }
        }
    }
}

// =============================================================================
// Query
// =============================================================================

/// A read query under construction.
///
/// This is the mutable artifact the orchestrator rewrites: `from` is
/// normalized to `table AS alias`, clause lists are replaced with their
/// compiled forms, and planned joins are appended to `joins`.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "builders have no effect until compiled or rendered"]
pub struct Query {
    /// FROM value. Before compilation: a table name, optionally with a
    /// caller-chosen alias (`users as u`). After: `"users" AS "u"`.
    pub from: String,
    pub columns: Vec<ClauseEntry>,
    pub wheres: Vec<ClauseEntry>,
    pub havings: Vec<ClauseEntry>,
    pub groups: Vec<ClauseEntry>,
    pub orders: Vec<ClauseEntry>,
    /// Joins appended by the planner, in emission order.
    pub joins: Vec<JoinClause>,
}

impl Query {
    pub fn table(name: &str) -> Self {
        Query {
            from: name.into(),
            ..Default::default()
        }
    }

    /// Add plain select columns.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns
            .extend(columns.into_iter().map(|c| ClauseEntry::Column(c.into())));
        self
    }

    pub fn select_raw(mut self, sql: &str) -> Self {
        self.columns.push(ClauseEntry::Raw(sql.into()));
        self
    }

    pub fn where_col(mut self, column: &str, operator: &str, value: &str) -> Self {
        self.wheres.push(ClauseEntry::Basic {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        });
        self
    }

    pub fn where_raw(mut self, sql: &str) -> Self {
        self.wheres.push(ClauseEntry::Raw(sql.into()));
        self
    }

    pub fn where_group(mut self, entries: Vec<ClauseEntry>) -> Self {
        self.wheres.push(ClauseEntry::Group(entries));
        self
    }

    pub fn having_col(mut self, column: &str, operator: &str, value: &str) -> Self {
        self.havings.push(ClauseEntry::Basic {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        });
        self
    }

    pub fn having_raw(mut self, sql: &str) -> Self {
        self.havings.push(ClauseEntry::Raw(sql.into()));
        self
    }

    pub fn group_by(mut self, column: &str) -> Self {
        self.groups.push(ClauseEntry::Column(column.into()));
        self
    }

    pub fn order_by(mut self, column: &str, dir: SortDir) -> Self {
        self.orders.push(ClauseEntry::Ordered {
            column: column.into(),
            dir,
        });
        self
    }

    pub fn order_by_raw(mut self, sql: &str) -> Self {
        self.orders.push(ClauseEntry::Raw(sql.into()));
        self
    }

    /// Render the query as a SQL string.
    ///
    /// Used for debug output and assertions; execution belongs to the
    /// database layer, not this crate.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let mut sql = String::from("SELECT ");
        if self.columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.render_list(&self.columns, ", "));
        }
        sql.push_str(" FROM ");
        sql.push_str(&self.from);

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.to_sql(dialect));
        }
        if !self.wheres.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.render_list(&self.wheres, " AND "));
        }
        if !self.groups.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.render_list(&self.groups, ", "));
        }
        if !self.havings.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&self.render_list(&self.havings, " AND "));
        }
        if !self.orders.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.render_list(&self.orders, ", "));
        }
        sql
    }

    fn render_list(&self, entries: &[ClauseEntry], separator: &str) -> String {
        entries
            .iter()
            .map(ClauseEntry::to_sql)
            .collect::<Vec<_>>()
            .join(separator)
    }
}
