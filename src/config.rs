//! TOML-based configuration.
//!
//! Supports a config file (autojoin.toml) with environment variable
//! expansion, plus `AUTO_JOIN_*` environment overrides.
//!
//! Example configuration:
//! ```toml
//! # The default join type for unannotated chain segments.
//! join_type = "left"
//!
//! # Generate simple sequential aliases (A, B, C, ..., then A1, B1, ...).
//! use_simple_aliases = true
//!
//! # Auto-alias columns whose field was inferred from a chain.
//! infer_aliases = true
//!
//! # Log the compiled SQL and join trace.
//! debug = false
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sql::query::JoinType;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Compiler configuration surface. Read-only during compilation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Join type for chain segments without a `|` override.
    pub join_type: JoinType,

    /// When true, joins get sequential aliases (A, B, C, ..., A1, B1, ...);
    /// otherwise aliases default to relation/table names.
    pub use_simple_aliases: bool,

    /// When true, a column whose field was inferred from a pure chain
    /// expression is auto-aliased with the chain key.
    pub infer_aliases: bool,

    /// Log the compiled SQL and the join trace at debug level.
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            join_type: JoinType::Left,
            use_simple_aliases: true,
            infer_aliases: true,
            debug: false,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file, expanding `${VAR}` references.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let expanded = expand_env_vars(&content)?;
        Ok(toml::from_str(&expanded)?)
    }

    /// Apply `AUTO_JOIN_*` environment overrides on top of these settings.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(join_type) = env::var("AUTO_JOIN_TYPE") {
            self.join_type = JoinType::parse(&join_type);
        }
        if let Ok(simple) = env::var("AUTO_JOIN_SIMPLE_ALIASES") {
            self.use_simple_aliases = is_truthy(&simple);
        }
        if let Ok(debug) = env::var("AUTO_JOIN_DEBUG") {
            self.debug = is_truthy(&debug);
        }
        self
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` syntax; a lone `$` is kept as-is.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_name = String::new();
            while let Some(&ch) = chars.peek() {
                if ch == '}' {
                    chars.next();
                    break;
                }
                var_name.push(ch);
                chars.next();
            }
            let value =
                env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
            result.push_str(&value);
        } else {
            result.push(c);
        }
    }

    Ok(result)
}
