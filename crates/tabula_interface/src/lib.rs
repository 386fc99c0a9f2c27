//! Collaborator traits for the Tabula library.
//!
//! The processor never reaches for storage or schema information on its
//! own; it is handed implementations of these traits.

mod codec;
mod schema;
mod table_query;

pub use codec::OutputCodec;
pub use schema::SchemaIntrospector;
pub use table_query::{QueryExecutor, RawRow};
