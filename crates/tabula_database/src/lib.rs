//! PostgreSQL backend for Tabula.
//!
//! Renders [`tabula_core::QuerySpec`]s to parameterized SQL and runs them
//! through Diesel, and reflects column lists from `information_schema`.

mod connection;
mod schema;
mod sql;
mod store;

pub use connection::{DEFAULT_POOL_SIZE, DatabaseConfig, create_pool, establish_connection};
pub use schema::{ColumnInfo, TableSchema, reflect_table_schema};
pub use sql::{RenderedQuery, escape_like, quote_ident, render_count, render_select};
pub use store::{PgPoolStore, PgTableStore};

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, tabula_error::DatabaseError>;
