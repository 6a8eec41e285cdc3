// Configuration validation

use crate::{ConfigError, Result};

/// Trait for validating configuration
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Field-level validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!("{} cannot be empty", field)));
        }
        Ok(())
    }

    pub fn one_of<T: PartialEq + ?Sized>(value: &T, allowed: &[&T], field: &str) -> Result<()> {
        if !allowed.contains(&value) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be one of the allowed values",
                field
            )));
        }
        Ok(())
    }

    /// `http://` or `https://` followed by a host
    pub fn is_url(value: &str, field: &str) -> Result<()> {
        let rest = value
            .strip_prefix("http://")
            .or_else(|| value.strip_prefix("https://"));
        match rest {
            Some(rest) if !rest.is_empty() && !rest.starts_with('/') => Ok(()),
            _ => Err(ConfigError::ValidationError(format!("{} must be a valid URL", field))),
        }
    }

    /// `local@domain.tld`, with no whitespace
    pub fn is_email(value: &str, field: &str) -> Result<()> {
        let valid = match value.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.split('.').count() >= 2
                    && domain.split('.').all(|part| !part.is_empty())
                    && !value.chars().any(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            return Err(ConfigError::ValidationError(format!("{} must be a valid email", field)));
        }
        Ok(())
    }

    /// Empty values are accepted; anything else must pass `rule`
    pub fn optional(value: &str, field: &str, rule: fn(&str, &str) -> Result<()>) -> Result<()> {
        if value.is_empty() { Ok(()) } else { rule(value, field) }
    }
}
