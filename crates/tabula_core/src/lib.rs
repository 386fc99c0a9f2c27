//! Core data types for the Tabula library.
//!
//! This crate provides the request, query, record and response types shared
//! by the processor and every storage backend.

mod direction;
mod entity;
mod envelope;
mod observability;
mod query;
mod record;
mod request;

pub use direction::SortDirection;
pub use entity::{
    Entity, EntityDescriptor, EntityDescriptorBuilder, EntityRegistry, RelationDescriptor,
    RelationKind,
};
pub use envelope::{ResultEnvelope, TableData};
pub use observability::init_tracing;
pub use query::{OrderBy, PageWindow, Predicate, QuerySpec, QuerySpecBuilder};
pub use record::Record;
pub use request::{PageLength, SortSpec, TableViewRequest, TableViewRequestBuilder};
