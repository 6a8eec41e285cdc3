// API configuration model

use crate::validation::{ConfigValidator, Validate};
use crate::Result;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Keel API";
pub const DEFAULT_DESCRIPTION: &str = "API built with Keel";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_HOST: &str = "localhost:8080";

/// Schemes an API may be served over
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ws", "wss"];

/// Top-level API settings, also used as document metadata.
///
/// Missing fields take their default when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub title: String,
    pub description: String,
    pub version: String,
    pub base_path: String,
    pub host: String,
    pub schemes: Vec<String>,
    pub contact: Contact,
    pub license: License,
    /// Enables debug-level logging
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub name: String,
    pub url: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct License {
    pub name: String,
    pub url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            version: DEFAULT_VERSION.to_string(),
            base_path: String::new(),
            host: DEFAULT_HOST.to_string(),
            schemes: vec!["http".to_string()],
            contact: Contact::default(),
            license: License::default(),
            debug: true,
        }
    }
}

impl Default for Contact {
    fn default() -> Self {
        Self {
            name: "API Support".to_string(),
            url: "https://github.com/pegasusheavy/keel".to_string(),
            email: "support@example.com".to_string(),
        }
    }
}

impl Default for License {
    fn default() -> Self {
        Self {
            name: "MIT".to_string(),
            url: "https://opensource.org/licenses/MIT".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact = contact;
        self
    }

    pub fn with_license(mut self, license: License) -> Self {
        self.license = license;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl Validate for ApiConfig {
    fn validate(&self) -> Result<()> {
        ConfigValidator::not_empty(&self.title, "title")?;
        ConfigValidator::not_empty(&self.version, "version")?;
        ConfigValidator::optional(&self.contact.url, "contact.url", ConfigValidator::is_url)?;
        ConfigValidator::optional(&self.contact.email, "contact.email", ConfigValidator::is_email)?;
        ConfigValidator::optional(&self.license.url, "license.url", ConfigValidator::is_url)?;
        for scheme in &self.schemes {
            ConfigValidator::one_of(scheme.as_str(), ALLOWED_SCHEMES, "schemes")?;
        }
        Ok(())
    }
}
