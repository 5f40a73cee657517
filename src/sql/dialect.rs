//! SQL dialect definitions and quoting rules.
//!
//! Each dialect implements `SqlDialect` for its identifier quoting style:
//!
//! - ANSI/PostgreSQL: `"identifier"`
//! - MySQL: `` `identifier` ``
//! - T-SQL: `[identifier]`
//!
//! The compiler never executes SQL; dialects only decide how the rewritten
//! fragments are spelled.

/// SQL dialect trait - defines how identifiers and literals are rendered.
///
/// Default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    /// Quote an identifier (table, column, alias).
    ///
    /// `*` passes through unquoted so wildcard selects survive rewriting.
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    ///
    /// All dialects use single quotes with `''` for escaping.
    fn quote_string(&self, s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }
}

/// ANSI SQL reference dialect: double-quoted identifiers.
#[derive(Debug, Clone, Copy)]
pub struct Ansi;

impl SqlDialect for Ansi {
    fn name(&self) -> &'static str {
        "ansi"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        if ident == "*" {
            return ident.into();
        }
        format!("\"{}\"", ident.replace('"', "\"\""))
    }
}

/// PostgreSQL. Quoting matches ANSI.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        Ansi.quote_identifier(ident)
    }
}

/// MySQL: backtick identifiers.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        if ident == "*" {
            return ident.into();
        }
        format!("`{}`", ident.replace('`', "``"))
    }
}

/// SQL Server: bracket identifiers.
#[derive(Debug, Clone, Copy)]
pub struct TSql;

impl SqlDialect for TSql {
    fn name(&self) -> &'static str {
        "tsql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        if ident == "*" {
            return ident.into();
        }
        format!("[{}]", ident.replace(']', "]]"))
    }
}

/// Supported dialects as a copyable enum.
///
/// Dispatches to the unit-struct implementations above; keeps call sites
/// free of trait objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    Ansi,
    Postgres,
    MySql,
    TSql,
}

impl Dialect {
    fn as_dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Ansi => &Ansi,
            Dialect::Postgres => &Postgres,
            Dialect::MySql => &MySql,
            Dialect::TSql => &TSql,
        }
    }

    pub fn name(&self) -> &'static str {
        self.as_dialect().name()
    }

    pub fn quote_identifier(&self, ident: &str) -> String {
        self.as_dialect().quote_identifier(ident)
    }

    pub fn quote_string(&self, s: &str) -> String {
        self.as_dialect().quote_string(s)
    }

    /// Render `alias.column` with both sides quoted.
    pub fn qualify(&self, alias: &str, column: &str) -> String {
        format!(
            "{}.{}",
            self.quote_identifier(alias),
            self.quote_identifier(column)
        )
    }

    /// Quote a possibly-qualified identifier reference, segment by segment
    /// (`agents.active` becomes `"agents"."active"`).
    pub fn quote_reference(&self, reference: &str) -> String {
        reference
            .split('.')
            .map(|part| self.quote_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Render a static condition value as a SQL literal: numeric values
    /// pass through bare, everything else becomes a string literal.
    pub fn literal(&self, raw: &str) -> String {
        if raw.parse::<i64>().is_ok() || raw.parse::<f64>().is_ok() {
            raw.to_string()
        } else {
            self.quote_string(raw)
        }
    }
}
