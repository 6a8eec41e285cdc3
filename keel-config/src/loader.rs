// Configuration file loaders

use crate::{ConfigError, Result};
use keel_core::logging::debug;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
    Env,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            "env" => Some(FileFormat::Env),
            _ => None,
        }
    }
}

/// Parses configuration files into a JSON value tree.
///
/// `Env` files become a flat object of raw variable names to string values.
#[derive(Debug, Clone, Copy)]
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Pick the format from the file extension
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::LoadError(format!("No file extension found: {}", path.display())))?;

        let format = FileFormat::from_extension(ext)
            .ok_or_else(|| ConfigError::LoadError(format!("Unsupported format: {}", ext)))?;

        Ok(Self::new(format))
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        debug!(path = %path.display(), format = ?self.format, "Loading configuration file");
        self.parse(&content)
    }

    pub fn parse(&self, content: &str) -> Result<Value> {
        match self.format {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e))),
            FileFormat::Toml => {
                let value: toml::Value = toml::from_str(content)
                    .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
                serde_json::to_value(value).map_err(|e| ConfigError::SerializationError(e.to_string()))
            }
            FileFormat::Env => {
                let mut map = Map::new();
                for item in dotenvy::from_read_iter(content.as_bytes()) {
                    let (key, value) =
                        item.map_err(|e| ConfigError::ParseError(format!("Env parse error: {}", e)))?;
                    map.insert(key, Value::String(value));
                }
                Ok(Value::Object(map))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_json() {
        let value = ConfigLoader::new(FileFormat::Json)
            .parse(r#"{"title": "Orders", "debug": false}"#)
            .unwrap();
        assert_eq!(value, json!({"title": "Orders", "debug": false}));
    }

    #[test]
    fn test_parse_toml_tables() {
        let toml = r#"
            title = "Orders"
            schemes = ["https"]

            [contact]
            name = "Ops"
        "#;

        let value = ConfigLoader::new(FileFormat::Toml).parse(toml).unwrap();
        assert_eq!(value["schemes"], json!(["https"]));
        assert_eq!(value["contact"]["name"], "Ops");
    }

    #[test]
    fn test_parse_env() {
        let env = "# comment\nKEEL_TITLE=\"Orders API\"\nKEEL_DEBUG=false\n";
        let value = ConfigLoader::new(FileFormat::Env).parse(env).unwrap();
        assert_eq!(value, json!({"KEEL_TITLE": "Orders API", "KEEL_DEBUG": "false"}));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ConfigLoader::new(FileFormat::Json).parse("{"),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            ConfigLoader::new(FileFormat::Toml).parse("title = "),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_extension("JSON"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_extension("toml"), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_extension("env"), Some(FileFormat::Env));
        assert_eq!(FileFormat::from_extension("yaml"), None);

        assert_eq!(ConfigLoader::auto("api.toml").unwrap().format(), FileFormat::Toml);
        assert!(ConfigLoader::auto("Makefile").is_err());
    }
}
