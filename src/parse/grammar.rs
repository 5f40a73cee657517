//! Micro-grammars for the embedded expression forms the clause compilers
//! understand: aggregate functions (both `COUNT(...)` and the `__count`
//! suffix shorthand), `COALESCE(...)`, and bitwise comparisons.
//!
//! These are regex matchers over a small closed set of shapes, not a SQL
//! grammar. Anything that does not match passes through the compilers
//! unchanged.

use std::sync::LazyLock;

use regex::Regex;

static AGGREGATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(COUNT|SUM|AVG|MIN|MAX)\((.+?)\)(?:\s+as\s+(\w+))?(.*)$").unwrap()
});

static SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.*?)__(count|sum|avg|min|max)(?:\s+as\s+(\w+))?$").unwrap()
});

static COALESCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^COALESCE\s*\((.*?)\)(.*)$").unwrap());

static COALESCE_ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^as\s+([A-Za-z_][A-Za-z0-9_]*)(.*)$").unwrap());

static BITWISE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z0-9_.]+)\s*(&)\s*(.+)$").unwrap());

static PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*$").unwrap());

static IDENT_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());

/// A detected aggregate form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    /// Uppercase function name (`COUNT`, `SUM`, ...).
    pub function: String,
    /// The expression inside the parentheses (or before the suffix).
    pub inner: String,
    pub alias: Option<String>,
    /// Trailing text after the aggregate, e.g. `> ?` in `COUNT(x) > ?`.
    pub trailing: String,
}

/// A detected `COALESCE(a, b, ...)` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coalesce {
    pub args: Vec<String>,
    pub alias: Option<String>,
    pub trailing: String,
}

/// A detected bitwise comparison, `left & rest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitwise {
    pub left: String,
    pub operator: String,
    pub rest: String,
}

/// Detect an aggregate expression.
///
/// `allow_suffix` gates the `inner__count` shorthand; WHERE and GROUP BY
/// columns only recognize the function form.
pub fn parse_aggregate(expression: &str, allow_suffix: bool) -> Option<Aggregate> {
    if let Some(caps) = AGGREGATE_RE.captures(expression) {
        return Some(Aggregate {
            function: caps[1].to_uppercase(),
            inner: caps[2].trim().to_string(),
            alias: caps.get(3).map(|m| m.as_str().to_string()),
            trailing: caps[4].trim().to_string(),
        });
    }

    if allow_suffix {
        if let Some(caps) = SUFFIX_RE.captures(expression) {
            let inner = caps[1].trim().to_string();
            if !inner.is_empty() {
                return Some(Aggregate {
                    function: caps[2].to_uppercase(),
                    inner,
                    alias: caps.get(3).map(|m| m.as_str().to_string()),
                    trailing: String::new(),
                });
            }
        }
    }

    None
}

/// Detect a `COALESCE(...)` expression with optional alias and trailing
/// condition (`COALESCE(a, b) as c`, `COALESCE(a, b) > ?`).
pub fn parse_coalesce(expression: &str) -> Option<Coalesce> {
    let caps = COALESCE_RE.captures(expression)?;
    let args = caps[1]
        .split(',')
        .map(|arg| arg.trim().to_string())
        .filter(|arg| !arg.is_empty())
        .collect();

    let remainder = caps[2].trim();
    let (alias, trailing) = match COALESCE_ALIAS_RE.captures(remainder) {
        Some(alias_caps) => (
            Some(alias_caps[1].to_string()),
            alias_caps[2].trim().to_string(),
        ),
        None => (None, remainder.to_string()),
    };

    Some(Coalesce {
        args,
        alias,
        trailing,
    })
}

/// Detect a bitwise comparison of the form `column & rest`.
///
/// Only the left operand is a candidate for path resolution; the rest of
/// the expression (placeholders, comparisons) passes through untouched.
pub fn parse_bitwise(expression: &str) -> Option<Bitwise> {
    let caps = BITWISE_RE.captures(expression)?;
    Some(Bitwise {
        left: caps[1].trim().to_string(),
        operator: caps[2].to_string(),
        rest: caps[3].trim().to_string(),
    })
}

/// Whether an expression looks like a relationship path: a bare
/// identifier (no whitespace, no operators) containing a dot or a chain
/// delimiter.
pub fn is_path_reference(expression: &str) -> bool {
    PATH_RE.is_match(expression) && (expression.contains('.') || expression.contains("__"))
}

/// Default alias for an aggregate select column: the function name plus
/// the compiled inner SQL with non-identifier characters stripped.
pub fn default_aggregate_alias(function: &str, inner_sql: &str) -> String {
    format!("{}_{}", function, IDENT_CHARS_RE.replace_all(inner_sql, ""))
}
