//! Configuration error types.

/// Where a rejected setting came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigOrigin {
    /// A configuration file that could not be read
    #[display("file")]
    File,
    /// TOML text that failed to parse or validate
    #[display("toml")]
    Toml,
    /// An environment variable
    #[display("environment")]
    Environment,
    /// Installing the global tracing subscriber
    #[display("tracing")]
    Tracing,
}

/// A setting that could not be loaded or failed validation.
///
/// # Examples
///
/// ```
/// use tabula_error::{ConfigError, ConfigOrigin};
///
/// let err = ConfigError::new(ConfigOrigin::Environment, "must be a boolean, got 'maybe'")
///     .with_key("TABULA_ENCODE_OUTPUT");
/// assert_eq!(err.key.as_deref(), Some("TABULA_ENCODE_OUTPUT"));
/// assert!(err.to_string().contains("environment TABULA_ENCODE_OUTPUT"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Where the setting came from
    pub origin: ConfigOrigin,
    /// Name of the offending setting, when one is known
    pub key: Option<String>,
    /// What went wrong
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create an error for a setting from `origin`.
    #[track_caller]
    pub fn new(origin: ConfigOrigin, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            origin,
            key: None,
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Name the setting that was rejected.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.key {
            Some(key) => write!(f, "Config Error ({} {}): ", self.origin, key)?,
            None => write!(f, "Config Error ({}): ", self.origin)?,
        }
        write!(f, "{} at line {} in {}", self.message, self.line, self.file)
    }
}

impl std::error::Error for ConfigError {}
