//! Table view request processing for Tabula.
//!
//! [`TableQueryProcessor`] turns a [`tabula_core::TableViewRequest`] into a
//! [`tabula_core::ResultEnvelope`] using injected schema and query
//! collaborators.

mod codec;
mod config;
mod memory;
mod options;
mod processor;

pub use codec::{Base64JsonCodec, RawRowsCodec, codec_for, decode_rows};
pub use config::ProcessorConfig;
pub use memory::InMemoryTableStore;
pub use options::{ProcessOptions, ProcessOptionsBuilder};
pub use processor::TableQueryProcessor;
