//! Relationship-path expression parsing.
//!
//! A raw column expression decomposes into three parts: an optional
//! trailing alias (`... as x`), a relationship chain (segments split on
//! `__`, each with an optional `|inner`/`|left` join override), and a
//! terminal field. The field separator is the *last* dot, so
//! `agent.departments.name` and its normalized spelling
//! `agent__departments.name` parse identically.

use std::sync::LazyLock;

use regex::Regex;

use crate::sql::query::JoinType;

/// Delimiter between chain segments in normalized notation.
pub const CHAIN_DELIMITER: &str = "__";

/// Delimiter between a segment name and its join-type override.
const JOIN_OVERRIDE_DELIMITER: char = '|';

static ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.*?)\s+as\s+(.*)$").unwrap());

/// One hop in a relationship chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub relation: String,
    pub join_type: JoinType,
}

/// A parsed column expression.
///
/// `field` is `None` when the expression was pure chain notation
/// (`agent__departments`); the planner then infers the field from the
/// terminal segment's related entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedColumn {
    pub chain: Vec<PathSegment>,
    pub field: Option<String>,
    pub alias: Option<String>,
}

/// Strip a trailing case-insensitive ` as <alias>` suffix.
pub fn split_alias(raw: &str) -> (String, Option<String>) {
    let raw = raw.trim();
    match ALIAS_RE.captures(raw) {
        Some(caps) => {
            let alias = caps[2].trim();
            let expression = caps[1].trim().to_string();
            if alias.is_empty() {
                (expression, None)
            } else {
                (expression, Some(alias.to_string()))
            }
        }
        None => (raw.to_string(), None),
    }
}

/// Normalize dot notation to chain notation: `user.agent.id` becomes
/// `user__agent.id`. Expressions without a dot pass through unchanged.
pub fn normalize_column(column: &str) -> String {
    match column.rsplit_once('.') {
        Some((chain, field)) => format!("{}.{}", chain.replace('.', CHAIN_DELIMITER), field),
        None => column.to_string(),
    }
}

/// Split a chain string into segments.
///
/// Empty segments are dropped. A leading segment case-insensitively equal
/// to `base_table` is removed, so `users__agent__departments` and
/// `agent__departments` describe the same chain. Each segment may carry a
/// join override (`departments|inner`); absent overrides use
/// `default_join`.
pub fn parse_chain(
    chain: &str,
    base_table: Option<&str>,
    default_join: JoinType,
) -> Vec<PathSegment> {
    let mut segments: Vec<&str> = chain
        .split(CHAIN_DELIMITER)
        .filter(|s| !s.is_empty())
        .collect();

    if let (Some(base), Some(first)) = (base_table, segments.first()) {
        let name = first
            .split(JOIN_OVERRIDE_DELIMITER)
            .next()
            .unwrap_or_default();
        if name.eq_ignore_ascii_case(base) {
            segments.remove(0);
        }
    }

    segments
        .into_iter()
        .map(|segment| match segment.split_once(JOIN_OVERRIDE_DELIMITER) {
            Some((relation, join)) => PathSegment {
                relation: relation.to_string(),
                join_type: JoinType::parse(join),
            },
            None => PathSegment {
                relation: segment.to_string(),
                join_type: default_join,
            },
        })
        .collect()
}

/// Parse a raw column expression into chain, field, and alias.
///
/// The last dot separates chain from field. An expression with chain
/// delimiters but no dot is all chain; field inference is deferred to the
/// planner, which knows the relation metadata. Everything else is a bare
/// field with an empty chain.
pub fn parse_column(raw: &str, base_table: Option<&str>, default_join: JoinType) -> ParsedColumn {
    let (expression, alias) = split_alias(raw);
    let expression = normalize_column(&expression);

    if let Some(dot) = expression.rfind('.') {
        let (chain_part, field) = expression.split_at(dot);
        return ParsedColumn {
            chain: parse_chain(chain_part, base_table, default_join),
            field: Some(field[1..].to_string()),
            alias,
        };
    }

    if expression.contains(CHAIN_DELIMITER) {
        return ParsedColumn {
            chain: parse_chain(&expression, base_table, default_join),
            field: None,
            alias,
        };
    }

    ParsedColumn {
        chain: Vec::new(),
        field: Some(expression),
        alias,
    }
}
