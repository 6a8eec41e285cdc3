// Environment variable loading

use crate::{ConfigError, Result};
use std::collections::HashMap;
use std::env::{self, VarError};

/// Prefix of the variables Keel reads by default, e.g. `KEEL_TITLE`
pub const DEFAULT_PREFIX: &str = "KEEL";

/// Reads prefixed variables.
///
/// With prefix `KEEL`, `KEEL_BASE_PATH=/v1` is reported as
/// `base_path = "/v1"`. Variables without the prefix are ignored.
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Prefixed variables of the process environment.
    ///
    /// Fails with [`ConfigError::EnvError`] when a prefixed variable holds a
    /// value that is not valid unicode. Other variables are not inspected.
    pub fn load(&self) -> Result<HashMap<String, String>> {
        let mut vars = HashMap::new();
        for (key, value) in env::vars_os() {
            let Some(name) = key.to_str().and_then(|k| self.strip(k)) else {
                continue;
            };
            let value = value
                .into_string()
                .map_err(|raw| ConfigError::EnvError(VarError::NotUnicode(raw)))?;
            vars.insert(name, value);
        }
        Ok(vars)
    }

    /// Keep the prefixed variables of `vars`, keyed by their lowercase
    /// unprefixed name
    pub fn filter<I, K, V>(&self, vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        vars.into_iter()
            .filter_map(|(key, value)| self.strip(key.as_ref()).map(|k| (k, value.into())))
            .collect()
    }

    fn strip(&self, key: &str) -> Option<String> {
        match &self.prefix {
            Some(prefix) => key
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_prefix('_'))
                .filter(|rest| !rest.is_empty())
                .map(str::to_lowercase),
            None => Some(key.to_lowercase()),
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(Some(DEFAULT_PREFIX.to_string()))
    }
}
