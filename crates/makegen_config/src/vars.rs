//! Ordered variable stores and `$(NAME)` expansion.

use std::collections::BTreeMap;

use crate::error::ConfigError;

/// An ordered name→value mapping.
///
/// Redefining a name replaces the prior value (last writer wins). Lookups
/// never expand; expansion is a [`VarScope`] concern because it needs the
/// full override chain.
#[derive(Clone, Debug, Default)]
pub struct VarStore {
    vars: BTreeMap<String, String>,
}

impl VarStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, replacing any prior binding.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Returns the raw (unexpanded) value bound to `name`.
    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Returns `true` if no variable is bound.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterates over all bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses a `NAME = value` line.
    ///
    /// Returns `None` when the line is not an assignment. The name must be
    /// a make-style identifier (`[A-Za-z0-9_]+`).
    pub fn parse_assignment(line: &str) -> Option<(&str, &str)> {
        let (name, value) = line.split_once('=')?;
        let name = name.trim();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return None;
        }
        Some((name, value.trim()))
    }
}

/// The override chain used for lookups: command line, then the unit's own
/// bindings, then the root unit's.
pub struct VarScope<'a> {
    /// Command-line `NAME=value` overrides.
    pub cmdline: &'a VarStore,
    /// The build unit's own descriptor bindings.
    pub unit: &'a VarStore,
    /// The root descriptor's bindings.
    pub root: &'a VarStore,
}

impl<'a> VarScope<'a> {
    /// Creates a scope over the three stores.
    pub fn new(cmdline: &'a VarStore, unit: &'a VarStore, root: &'a VarStore) -> Self {
        Self {
            cmdline,
            unit,
            root,
        }
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        self.cmdline
            .get_raw(name)
            .or_else(|| self.unit.get_raw(name))
            .or_else(|| self.root.get_raw(name))
    }

    /// Returns the expanded value of `name`.
    ///
    /// Undefined variables and values that expand to whitespace only are
    /// both reported as `None`, so callers can distinguish "set to empty"
    /// from "meaningfully set".
    pub fn get(&self, name: &str) -> Result<Option<String>, ConfigError> {
        let Some(raw) = self.lookup(name) else {
            return Ok(None);
        };
        let mut stack = vec![name.to_string()];
        let expanded = self.expand_with(raw, &mut stack)?;
        if expanded.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(expanded))
        }
    }

    /// Rewrites all `$(NAME)` occurrences in `text` left to right.
    ///
    /// `${...}` is passed through literally and `$$` is a literal `$`.
    pub fn expand(&self, text: &str) -> Result<String, ConfigError> {
        let mut stack = Vec::new();
        self.expand_with(text, &mut stack)
    }

    /// Expands then splits on whitespace into an ordered token sequence.
    pub fn get_array(&self, name: &str) -> Result<Vec<String>, ConfigError> {
        Ok(self
            .get(name)?
            .map(|value| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default())
    }

    fn expand_with(&self, text: &str, stack: &mut Vec<String>) -> Result<String, ConfigError> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(idx) = rest.find('$') {
            out.push_str(&rest[..idx]);
            let after = &rest[idx + 1..];
            if let Some(after_dollar) = after.strip_prefix('$') {
                out.push('$');
                rest = after_dollar;
            } else if let Some(after_paren) = after.strip_prefix('(') {
                let Some(close) = after_paren.find(')') else {
                    return Err(ConfigError::UnmatchedParen {
                        text: text.to_string(),
                    });
                };
                let name = &after_paren[..close];
                if stack.iter().any(|n| n == name) {
                    return Err(ConfigError::RecursiveVariable {
                        name: name.to_string(),
                    });
                }
                if let Some(value) = self.lookup(name) {
                    let value = value.to_string();
                    stack.push(name.to_string());
                    out.push_str(&self.expand_with(&value, stack)?);
                    stack.pop();
                }
                rest = &after_paren[close + 1..];
            } else {
                // `${...}` and any other `$x` pass through literally.
                out.push('$');
                rest = after;
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}
