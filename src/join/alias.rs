//! Table alias allocation and memoization.
//!
//! Aliases are keyed by relationship chain key and append-only for the
//! lifetime of one query compilation: once a key maps to an alias, that
//! mapping never changes, and no two keys ever share an alias.

use std::collections::HashMap;

/// Allocates and memoizes table aliases per chain key.
#[derive(Debug, Clone, Default)]
pub struct AliasManager {
    map: HashMap<String, String>,
    counter: usize,
    simple: bool,
}

impl AliasManager {
    /// `simple` enables sequential alias generation (A, B, C, ..., A1,
    /// B1, ...); otherwise keys fall back to a provided default or the
    /// key itself.
    pub fn new(simple: bool) -> Self {
        AliasManager {
            simple,
            ..Default::default()
        }
    }

    /// Return the memoized alias for `key`, allocating one if absent.
    ///
    /// Sequential generation skips any value already in use, so a forced
    /// custom alias like `A` can never collide with a generated one.
    pub fn get_alias(&mut self, key: &str, default: Option<&str>) -> String {
        if let Some(alias) = self.map.get(key) {
            return alias.clone();
        }
        let alias = if self.simple {
            self.next_sequential()
        } else {
            default.unwrap_or(key).to_string()
        };
        self.map.insert(key.to_string(), alias.clone());
        alias
    }

    /// Force-assign an alias for `key`, overwriting any prior mapping.
    pub fn set_alias(&mut self, key: &str, alias: &str) {
        self.map.insert(key.to_string(), alias.to_string());
    }

    /// The alias already assigned to `key`, if any.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// Resolve an alias honoring entity-declared overrides.
    ///
    /// If the override map pins an alias for `key` and that alias is not
    /// already in use by another key, it is force-assigned first; then
    /// resolution proceeds as usual.
    pub fn resolve_model_alias(
        &mut self,
        overrides: Option<&HashMap<String, String>>,
        key: &str,
        default: Option<&str>,
    ) -> String {
        if let Some(custom) = overrides.and_then(|map| map.get(key)) {
            if !custom.is_empty() && !self.in_use(custom) && self.map.get(key) != Some(custom) {
                self.set_alias(key, custom);
            }
        }
        self.get_alias(key, default)
    }

    fn in_use(&self, alias: &str) -> bool {
        self.map.values().any(|v| v == alias)
    }

    fn next_sequential(&mut self) -> String {
        loop {
            let letter = (b'A' + (self.counter % 26) as u8) as char;
            let alias = if self.counter < 26 {
                letter.to_string()
            } else {
                format!("{}{}", letter, self.counter / 26)
            };
            self.counter += 1;
            if !self.in_use(&alias) {
                return alias;
            }
        }
    }
}
