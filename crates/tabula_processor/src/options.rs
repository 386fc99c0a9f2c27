//! Per-call processing options.

use crate::ProcessorConfig;
use derive_builder::Builder;
use derive_getters::Getters;
use tabula_core::QuerySpec;

/// Options for one `process` call.
///
/// ```
/// use tabula_processor::ProcessOptions;
///
/// let options = ProcessOptions::builder()
///     .relation("posts")
///     .encode_output(false)
///     .build()
///     .unwrap();
/// assert_eq!(options.eager_load(), &vec!["posts".to_string()]);
/// assert!(!options.expose_hidden_fields());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder, Getters)]
#[builder(setter(into, strip_option), default)]
pub struct ProcessOptions {
    /// Pre-scoped starting query instead of a select-all
    base_query: Option<QuerySpec>,
    /// Relation names to eager-load
    #[builder(setter(each(name = "relation", into)))]
    eager_load: Vec<String>,
    /// Base64-encode the row payload
    encode_output: bool,
    /// Reveal hidden fields on every row
    expose_hidden_fields: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self::from_config(&ProcessorConfig::default())
    }
}

impl ProcessOptions {
    /// Create a new builder seeded with the built-in defaults.
    pub fn builder() -> ProcessOptionsBuilder {
        ProcessOptionsBuilder::default()
    }

    /// Options carrying a configuration's defaults.
    pub fn from_config(config: &ProcessorConfig) -> Self {
        Self {
            base_query: None,
            eager_load: Vec::new(),
            encode_output: *config.encode_output(),
            expose_hidden_fields: *config.expose_hidden_fields(),
        }
    }
}
