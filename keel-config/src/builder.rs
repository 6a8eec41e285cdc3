// Layered configuration loading

use crate::config::ApiConfig;
use crate::env::EnvLoader;
use crate::loader::{ConfigLoader, FileFormat};
use crate::validation::Validate;
use crate::{ConfigError, Result};
use keel_core::logging::{debug, info, trace};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
enum EnvSource {
    Process,
    Vars(Vec<(String, String)>),
    Disabled,
}

/// Builds an [`ApiConfig`] from layered sources.
///
/// Later layers win: defaults, then files in the order they were added,
/// then the dotenv file, then environment variables. Objects are merged
/// key by key, everything else is replaced.
///
/// ```
/// use keel_config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .vars([("KEEL_TITLE", "Orders"), ("KEEL_SCHEMES", "https, wss")])
///     .build()
///     .unwrap();
///
/// assert_eq!(config.title, "Orders");
/// assert_eq!(config.schemes, vec!["https", "wss"]);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    defaults: ApiConfig,
    files: Vec<PathBuf>,
    dotenv: Option<PathBuf>,
    env: EnvLoader,
    source: EnvSource,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            defaults: ApiConfig::default(),
            files: Vec::new(),
            dotenv: None,
            env: EnvLoader::default(),
            source: EnvSource::Process,
        }
    }

    /// Replace the base layer
    pub fn defaults(mut self, defaults: ApiConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Add a JSON, TOML or `.env`-style file, picked by extension
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.push(path.as_ref().to_path_buf());
        self
    }

    /// Read variables from a dotenv file. The process environment is not
    /// modified.
    pub fn dotenv(mut self, path: impl AsRef<Path>) -> Self {
        self.dotenv = Some(path.as_ref().to_path_buf());
        self
    }

    /// Variable prefix, `KEEL` by default
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env = EnvLoader::new(Some(prefix.into()));
        self
    }

    /// Use these variables instead of the process environment
    pub fn vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.source = EnvSource::Vars(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Skip the environment layer
    pub fn without_env(mut self) -> Self {
        self.source = EnvSource::Disabled;
        self
    }

    /// Merge every layer, deserialize and validate
    pub fn build(self) -> Result<ApiConfig> {
        let mut value =
            serde_json::to_value(&self.defaults).map_err(|e| ConfigError::SerializationError(e.to_string()))?;

        for path in &self.files {
            let loader = ConfigLoader::auto(path)?;
            let layer = loader.load_file(path)?;
            let layer = match loader.format() {
                FileFormat::Env => overrides(&self.env.filter(string_pairs(layer)))?,
                _ => layer,
            };
            merge(&mut value, layer);
        }

        if let Some(path) = &self.dotenv {
            let vars = dotenvy::from_path_iter(path)
                .map_err(dotenv_error)?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| ConfigError::ParseError(format!("Env parse error: {}", e)))?;
            debug!(path = %path.display(), variables = vars.len(), "Loaded dotenv file");
            merge(&mut value, overrides(&self.env.filter(vars))?);
        }

        let vars = match self.source {
            EnvSource::Process => self.env.load()?,
            EnvSource::Vars(vars) => self.env.filter(vars),
            EnvSource::Disabled => HashMap::new(),
        };
        merge(&mut value, overrides(&vars)?);

        let config: ApiConfig =
            serde_json::from_value(value).map_err(|e| ConfigError::DeserializationError(e.to_string()))?;
        config.validate()?;

        info!(title = %config.title, version = %config.version, "Configuration loaded");
        Ok(config)
    }
}

fn dotenv_error(err: dotenvy::Error) -> ConfigError {
    match err {
        dotenvy::Error::Io(e) => ConfigError::IoError(e),
        dotenvy::Error::EnvVar(e) => ConfigError::EnvError(e),
        other => ConfigError::LoadError(other.to_string()),
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn string_pairs(value: Value) -> Vec<(String, String)> {
    match value {
        Value::Object(map) => map
            .into_iter()
            .filter_map(|(k, v)| match v {
                Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Map unprefixed variable names onto the config tree
fn overrides(vars: &HashMap<String, String>) -> Result<Value> {
    let mut root = Map::new();
    let mut contact = Map::new();
    let mut license = Map::new();

    for (key, raw) in vars {
        match key.as_str() {
            "title" | "description" | "version" | "base_path" | "host" => {
                root.insert(key.clone(), Value::String(raw.clone()));
            }
            "schemes" => {
                let schemes = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| Value::String(s.to_string()))
                    .collect();
                root.insert(key.clone(), Value::Array(schemes));
            }
            "debug" => {
                root.insert(key.clone(), Value::Bool(parse_bool(key, raw)?));
            }
            "contact_name" | "contact_url" | "contact_email" => {
                contact.insert(key["contact_".len()..].to_string(), Value::String(raw.clone()));
            }
            "license_name" | "license_url" => {
                license.insert(key["license_".len()..].to_string(), Value::String(raw.clone()));
            }
            _ => trace!(variable = %key, "Ignoring unknown configuration variable"),
        }
    }

    if !contact.is_empty() {
        root.insert("contact".to_string(), Value::Object(contact));
    }
    if !license.is_empty() {
        root.insert("license".to_string(), Value::Object(license));
    }
    Ok(Value::Object(root))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::ParseError(format!("{} must be a boolean, got {:?}", key, raw))),
    }
}

/// Merge `layer` into `base`; objects merge per key, anything else replaces
fn merge(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base), Value::Object(layer)) => {
            for (key, value) in layer {
                merge(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_is_deep() {
        let mut base = json!({"title": "a", "contact": {"name": "n", "email": "e"}});
        merge(&mut base, json!({"contact": {"email": "x"}, "schemes": ["https"]}));
        assert_eq!(
            base,
            json!({"title": "a", "contact": {"name": "n", "email": "x"}, "schemes": ["https"]})
        );
    }

    #[test]
    fn test_overrides_mapping() {
        let vars: HashMap<String, String> = [
            ("title", "Orders"),
            ("schemes", "https,, wss "),
            ("debug", "off"),
            ("contact_email", "ops@example.com"),
            ("license_name", "Apache-2.0"),
            ("unrelated", "x"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let value = overrides(&vars).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Orders",
                "schemes": ["https", "wss"],
                "debug": false,
                "contact": {"email": "ops@example.com"},
                "license": {"name": "Apache-2.0"}
            })
        );
    }

    #[test]
    fn test_bad_boolean() {
        let vars = HashMap::from([("debug".to_string(), "maybe".to_string())]);
        let err = overrides(&vars).unwrap_err();
        assert!(err.to_string().contains("debug must be a boolean"));
    }

    #[test]
    fn test_env_layer_wins_over_defaults() {
        let config = ConfigBuilder::new()
            .vars([("KEEL_HOST", "api.example.com"), ("KEEL_DEBUG", "false")])
            .build()
            .unwrap();
        assert_eq!(config.host, "api.example.com");
        assert!(!config.debug);
        assert_eq!(config.title, "Keel API");
    }

    #[test]
    fn test_invalid_result_is_rejected() {
        let result = ConfigBuilder::new().vars([("KEEL_SCHEMES", "gopher")]).build();
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_custom_prefix() {
        let config = ConfigBuilder::new()
            .prefix("ORDERS")
            .vars([("ORDERS_TITLE", "Orders"), ("KEEL_TITLE", "ignored")])
            .build()
            .unwrap();
        assert_eq!(config.title, "Orders");
    }
}
