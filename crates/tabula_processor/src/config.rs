//! Processor configuration.

use crate::ProcessOptions;
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tabula_error::{ConfigError, ConfigOrigin};

/// Defaults applied to every processed request.
///
/// Loaded from a TOML file or from `TABULA_*` environment variables; every
/// field has a default so an empty file is valid.
///
/// A request without a `length` returns every filtered row unless
/// `default_page_length` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct ProcessorConfig {
    /// Base64-encode the row payload
    #[serde(default = "default_encode_output")]
    encode_output: bool,
    /// Reveal fields the entity normally conceals
    #[serde(default)]
    expose_hidden_fields: bool,
    /// Ignore letter case when matching the search text
    #[serde(default = "default_case_insensitive_search")]
    case_insensitive_search: bool,
    /// Page length when the request sends none; unset means no limit
    #[serde(default)]
    default_page_length: Option<u64>,
}

fn default_encode_output() -> bool {
    true
}

fn default_case_insensitive_search() -> bool {
    true
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            encode_output: default_encode_output(),
            expose_hidden_fields: false,
            case_insensitive_search: default_case_insensitive_search(),
            default_page_length: None,
        }
    }
}

impl ProcessorConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, the TOML is invalid, or a
    /// value is out of range.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(
                ConfigOrigin::File,
                format!("Failed to read {}: {}", path.display(), e),
            )
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text.
    ///
    /// ```
    /// use tabula_processor::ProcessorConfig;
    ///
    /// let config = ProcessorConfig::from_toml_str("encode_output = false").unwrap();
    /// assert!(!config.encode_output());
    /// assert_eq!(*config.default_page_length(), None);
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|e| {
            ConfigError::new(ConfigOrigin::Toml, format!("Invalid configuration: {}", e))
        })?;
        config.validate(ConfigOrigin::Toml)
    }

    /// Create config from environment variables, loading `.env` if present.
    ///
    /// Reads:
    /// - `TABULA_ENCODE_OUTPUT` (default: true)
    /// - `TABULA_EXPOSE_HIDDEN_FIELDS` (default: false)
    /// - `TABULA_CASE_INSENSITIVE_SEARCH` (default: true)
    /// - `TABULA_DEFAULT_PAGE_LENGTH` (default: unset, no limit)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            encode_output: env_bool(&lookup, "TABULA_ENCODE_OUTPUT", defaults.encode_output)?,
            expose_hidden_fields: env_bool(
                &lookup,
                "TABULA_EXPOSE_HIDDEN_FIELDS",
                defaults.expose_hidden_fields,
            )?,
            case_insensitive_search: env_bool(
                &lookup,
                "TABULA_CASE_INSENSITIVE_SEARCH",
                defaults.case_insensitive_search,
            )?,
            default_page_length: match lookup("TABULA_DEFAULT_PAGE_LENGTH") {
                Some(raw) => Some(raw.trim().parse().map_err(|_| {
                    ConfigError::new(
                        ConfigOrigin::Environment,
                        format!("must be a positive integer, got '{}'", raw),
                    )
                    .with_key("TABULA_DEFAULT_PAGE_LENGTH")
                })?),
                None => defaults.default_page_length,
            },
        };
        config.validate(ConfigOrigin::Environment)
    }

    fn validate(self, origin: ConfigOrigin) -> Result<Self, ConfigError> {
        if self.default_page_length == Some(0) {
            return Err(
                ConfigError::new(origin, "must be positive").with_key("default_page_length")
            );
        }
        Ok(self)
    }

    /// Per-call options seeded from this configuration.
    pub fn default_options(&self) -> ProcessOptions {
        ProcessOptions::from_config(self)
    }
}

fn env_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::new(
                ConfigOrigin::Environment,
                format!("must be a boolean, got '{}'", raw),
            )
            .with_key(key)),
        },
    }
}
