// Configuration management for Keel
//
// `ApiConfig` carries the API metadata and runtime switches. It can be built
// in code or loaded in layers from JSON/TOML files, a dotenv file and
// `KEEL_*` environment variables.

pub mod builder;
pub mod config;
pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use builder::ConfigBuilder;
pub use config::{ALLOWED_SCHEMES, ApiConfig, Contact, License};
pub use env::{DEFAULT_PREFIX, EnvLoader};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::{ConfigValidator, Validate};

impl ApiConfig {
    /// Load a single file over the defaults, ignoring the environment
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        ConfigBuilder::new().without_env().file(path).build()
    }

    /// Defaults overridden by `KEEL_*` environment variables
    pub fn from_env() -> Result<Self> {
        ConfigBuilder::new().build()
    }
}
