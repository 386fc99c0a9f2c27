//! Server-side processing for client-side table widgets.
//!
//! A [`TableQueryProcessor`] takes one [`TableViewRequest`] (search text,
//! sort column, page window, draw token), runs it against a registered
//! entity's table and returns a [`ResultEnvelope`] the widget can render.
//!
//! Storage is reached only through the [`SchemaIntrospector`] and
//! [`QueryExecutor`] traits. [`InMemoryTableStore`] implements both for
//! tests; enable the `database` feature for the PostgreSQL stores.

pub use tabula_core::{
    Entity, EntityDescriptor, EntityDescriptorBuilder, EntityRegistry, OrderBy, PageLength, PageWindow, Predicate, QuerySpec, QuerySpecBuilder, Record,
    RelationDescriptor, RelationKind, ResultEnvelope, SortDirection, SortSpec, TableData,
    TableViewRequest, TableViewRequestBuilder, init_tracing,
};
pub use tabula_error::{
    CodecError, ConfigError, ConfigOrigin, DatabaseError, DatabaseErrorKind,
    InvalidEntityTypeError, InvalidRequestError, InvalidSortColumnError, QueryStage, TabulaError,
    TabulaErrorKind, TabulaResult, UnknownRelationError,
};
pub use tabula_interface::{OutputCodec, QueryExecutor, RawRow, SchemaIntrospector};
pub use tabula_processor::{
    Base64JsonCodec, InMemoryTableStore, ProcessOptions, ProcessOptionsBuilder, ProcessorConfig,
    RawRowsCodec, TableQueryProcessor, codec_for, decode_rows,
};

#[cfg(feature = "database")]
pub use tabula_database::{
    ColumnInfo, DEFAULT_POOL_SIZE, DatabaseConfig, PgPoolStore, PgTableStore, TableSchema,
    create_pool, establish_connection, reflect_table_schema,
};
