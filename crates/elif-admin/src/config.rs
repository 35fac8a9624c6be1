//! Admin configuration and builder

use crate::relationships::LoadingStrategy;
use serde::{Deserialize, Serialize};
use service_builder::builder;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable prefix for admin settings
pub const ENV_PREFIX: &str = "ELIF_ADMIN_";

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Configuration validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Create a validation failed error
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }
}

/// Defaults applied to field sets at definition time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[builder]
pub struct AdminConfig {
    /// Upper bound on rows fetched for collection relationships
    #[builder(default = "25")]
    pub relationship_page_size: usize,

    /// Default attachment size bound in bytes
    #[builder(default = "10 * 1024 * 1024")]
    pub max_upload_size: u64,

    /// Default storage location for attachments
    #[builder(default = "String::from(\"local\")")]
    pub default_disk: String,

    /// Minimum characters before type-ahead search fires
    #[builder(default = "1")]
    pub search_min_chars: usize,

    /// Loading strategy for relationships that declare none
    #[builder(default)]
    pub default_loading: LoadingStrategy,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            relationship_page_size: 25,
            max_upload_size: 10 * 1024 * 1024,
            default_disk: "local".to_string(),
            search_min_chars: 1,
            default_loading: LoadingStrategy::Lazy,
        }
    }
}

impl AdminConfig {
    pub fn relationship_page_size(&self) -> usize {
        self.relationship_page_size
    }

    pub fn max_upload_size(&self) -> u64 {
        self.max_upload_size
    }

    pub fn default_disk(&self) -> &str {
        &self.default_disk
    }

    /// Characters typed before a relationship search is sent
    pub fn search_min_chars(&self) -> usize {
        self.search_min_chars
    }

    pub fn default_loading(&self) -> LoadingStrategy {
        self.default_loading
    }

    /// Load configuration from `ELIF_ADMIN_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(size) = parse_var(&lookup, "RELATIONSHIP_PAGE_SIZE", "a positive integer")? {
            config.relationship_page_size = size;
        }
        if let Some(size) = parse_var(&lookup, "MAX_UPLOAD_SIZE", "a size in bytes")? {
            config.max_upload_size = size;
        }
        if let Some(disk) = lookup(&format!("{}DEFAULT_DISK", ENV_PREFIX)) {
            config.default_disk = disk;
        }
        if let Some(chars) = parse_var(&lookup, "SEARCH_MIN_CHARS", "a non-negative integer")? {
            config.search_min_chars = chars;
        }
        if let Some(loading) = parse_var(&lookup, "DEFAULT_LOADING", "eager or lazy")? {
            config.default_loading = loading;
        }

        config.validate()?;
        tracing::debug!("Loaded admin configuration: {:?}", config);
        Ok(config)
    }

    /// Parse configuration from a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.relationship_page_size == 0 {
            return Err(ConfigError::validation_failed(
                "relationship_page_size must be greater than zero",
            ));
        }

        if self.max_upload_size == 0 {
            return Err(ConfigError::validation_failed(
                "max_upload_size must be greater than zero",
            ));
        }

        if self.default_disk.trim().is_empty() {
            return Err(ConfigError::validation_failed("default_disk cannot be empty"));
        }

        Ok(())
    }
}

// Add convenience methods to the generated builder
impl AdminConfigBuilder {
    pub fn eager_by_default(self) -> Self {
        self.default_loading(LoadingStrategy::Eager)
    }

    pub fn upload_limit_mb(self, megabytes: u64) -> Self {
        self.max_upload_size(megabytes.saturating_mul(1024 * 1024))
    }

    /// Build and validate, rejecting settings `validate` would refuse
    pub fn build_config(self) -> Result<AdminConfig, ConfigError> {
        let config = self
            .build_with_defaults()
            .map_err(|_| ConfigError::validation_failed("admin configuration could not be built"))?;
        config.validate()?;
        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, expected: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let key = format!("{}{}", ENV_PREFIX, name);
    match lookup(&key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::invalid_value(key, raw, expected)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AdminConfig::default();
        assert_eq!(config.relationship_page_size, 25);
        assert_eq!(config.max_upload_size, 10 * 1024 * 1024);
        assert_eq!(config.default_disk, "local");
        assert_eq!(config.default_loading, LoadingStrategy::Lazy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = AdminConfig::builder()
            .relationship_page_size(50)
            .upload_limit_mb(2)
            .eager_by_default()
            .build_config()
            .unwrap();

        assert_eq!(config.relationship_page_size, 50);
        assert_eq!(config.max_upload_size, 2 * 1024 * 1024);
        assert_eq!(config.default_loading, LoadingStrategy::Eager);
    }

    #[test]
    fn test_builder_rejects_invalid_settings() {
        let err = AdminConfig::builder().relationship_page_size(0).build_config().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed { .. }));

        let err = AdminConfig::builder().default_disk(" ".to_string()).build_config().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed { .. }));
    }

    #[test]
    fn test_upload_limit_saturates() {
        let config = AdminConfig::builder().upload_limit_mb(u64::MAX).build_config().unwrap();
        assert_eq!(config.max_upload_size(), u64::MAX);
    }

    #[test]
    fn test_from_lookup() {
        let config = AdminConfig::from_lookup(lookup_from(&[
            ("ELIF_ADMIN_RELATIONSHIP_PAGE_SIZE", "10"),
            ("ELIF_ADMIN_DEFAULT_DISK", "s3"),
            ("ELIF_ADMIN_DEFAULT_LOADING", "eager"),
        ]))
        .unwrap();

        assert_eq!(config.relationship_page_size, 10);
        assert_eq!(config.default_disk, "s3");
        assert_eq!(config.default_loading, LoadingStrategy::Eager);
        assert_eq!(config.search_min_chars, 1);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = AdminConfig::from_lookup(lookup_from(&[("ELIF_ADMIN_MAX_UPLOAD_SIZE", "huge")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "ELIF_ADMIN_MAX_UPLOAD_SIZE"));

        let err = AdminConfig::from_lookup(lookup_from(&[("ELIF_ADMIN_RELATIONSHIP_PAGE_SIZE", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed { .. }));
    }

    #[test]
    fn test_from_yaml() {
        let config = AdminConfig::from_yaml_str("default_disk: public\nsearch_min_chars: 3\n").unwrap();
        assert_eq!(config.default_disk, "public");
        assert_eq!(config.search_min_chars, 3);
        assert_eq!(config.relationship_page_size, 25);

        assert!(AdminConfig::from_yaml_str("default_disk: ''\n").is_err());
    }
}
