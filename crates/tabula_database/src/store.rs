//! Diesel-backed implementations of the collaborator traits.

use crate::{
    DatabaseConfig, DatabaseResult, RenderedQuery, reflect_table_schema, render_count,
    render_select,
};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_types::{BigInt, Text};
use std::sync::{Arc, Mutex};
use tabula_core::{EntityDescriptor, QuerySpec};
use tabula_error::{DatabaseError, DatabaseErrorKind, QueryStage, TabulaResult};
use tabula_interface::{QueryExecutor, RawRow, SchemaIntrospector};
use tracing::{debug, error, instrument};

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[derive(QueryableByName)]
struct JsonRow {
    #[diesel(sql_type = Text)]
    row_json: String,
}

fn bound(rendered: &RenderedQuery) -> BoxedSqlQuery<'static, Pg, SqlQuery> {
    let mut query = diesel::sql_query(rendered.sql.clone()).into_boxed::<Pg>();
    for value in &rendered.binds {
        query = query.bind::<Text, _>(value.clone());
    }
    query
}

fn count_rows(conn: &mut PgConnection, spec: &QuerySpec) -> DatabaseResult<u64> {
    let rendered = render_count(spec);
    debug!(sql = %rendered.sql, binds = rendered.binds.len(), "Counting rows");

    let row = bound(&rendered).get_result::<CountRow>(conn).map_err(|e| {
        error!(error = %e, "Count query failed");
        DatabaseError::query(QueryStage::Count, spec.table(), e)
    })?;
    Ok(row.count.max(0) as u64)
}

fn fetch_rows(conn: &mut PgConnection, spec: &QuerySpec) -> DatabaseResult<Vec<RawRow>> {
    let rendered = render_select(spec);
    debug!(sql = %rendered.sql, binds = rendered.binds.len(), "Fetching rows");

    let rows = bound(&rendered).load::<JsonRow>(conn).map_err(|e| {
        error!(error = %e, "Fetch query failed");
        DatabaseError::query(QueryStage::Fetch, spec.table(), e)
    })?;

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_str::<RawRow>(&row.row_json).map_err(|e| {
                error!(index, error = %e, "Row did not decode to a JSON object");
                DatabaseError::new(DatabaseErrorKind::RowDecode {
                    index,
                    message: e.to_string(),
                })
            })
        })
        .collect()
}

fn column_names(conn: &mut PgConnection, entity: &EntityDescriptor) -> DatabaseResult<Vec<String>> {
    Ok(reflect_table_schema(conn, entity.table())?.column_names())
}

/// Table store over a single shared connection.
#[derive(Clone)]
pub struct PgTableStore {
    conn: Arc<Mutex<PgConnection>>,
}

impl PgTableStore {
    /// Wrap an existing connection.
    pub fn new(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }

    /// Open one connection with `config`.
    pub fn connect(config: &DatabaseConfig) -> DatabaseResult<Self> {
        Ok(Self::new(Arc::new(Mutex::new(crate::establish_connection(
            config,
        )?))))
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut PgConnection) -> DatabaseResult<T>,
    ) -> DatabaseResult<T> {
        let mut conn = self.conn.lock().map_err(|_| {
            error!("Connection mutex poisoned");
            DatabaseError::new(DatabaseErrorKind::LockPoisoned)
        })?;
        f(&mut conn)
    }
}

impl std::fmt::Debug for PgTableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgTableStore").finish_non_exhaustive()
    }
}

impl SchemaIntrospector for PgTableStore {
    #[instrument(skip(self, entity), fields(table = %entity.table()))]
    fn columns_of(&self, entity: &EntityDescriptor) -> TabulaResult<Vec<String>> {
        Ok(self.with_conn(|conn| column_names(conn, entity))?)
    }
}

impl QueryExecutor for PgTableStore {
    #[instrument(skip(self, spec), fields(table = %spec.table()))]
    fn count(&self, spec: &QuerySpec) -> TabulaResult<u64> {
        Ok(self.with_conn(|conn| count_rows(conn, spec))?)
    }

    #[instrument(skip(self, spec), fields(table = %spec.table(), relations = spec.relations().len()))]
    fn fetch(&self, spec: &QuerySpec) -> TabulaResult<Vec<RawRow>> {
        Ok(self.with_conn(|conn| fetch_rows(conn, spec))?)
    }
}

/// Table store that checks a connection out of an r2d2 pool per call.
#[derive(Clone)]
pub struct PgPoolStore {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl PgPoolStore {
    /// Wrap an existing pool.
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }

    /// Build a pool sized by `config`.
    pub fn connect(config: &DatabaseConfig) -> DatabaseResult<Self> {
        Ok(Self::new(crate::create_pool(config)?))
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut PgConnection) -> DatabaseResult<T>,
    ) -> DatabaseResult<T> {
        let mut conn = self.pool.get().map_err(|e| {
            error!(error = %e, "Failed to check out pooled connection");
            DatabaseError::new(DatabaseErrorKind::Pool(e.to_string()))
        })?;
        f(&mut conn)
    }
}

impl std::fmt::Debug for PgPoolStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgPoolStore")
            .field("max_size", &self.pool.max_size())
            .finish()
    }
}

impl SchemaIntrospector for PgPoolStore {
    #[instrument(skip(self, entity), fields(table = %entity.table()))]
    fn columns_of(&self, entity: &EntityDescriptor) -> TabulaResult<Vec<String>> {
        Ok(self.with_conn(|conn| column_names(conn, entity))?)
    }
}

impl QueryExecutor for PgPoolStore {
    #[instrument(skip(self, spec), fields(table = %spec.table()))]
    fn count(&self, spec: &QuerySpec) -> TabulaResult<u64> {
        Ok(self.with_conn(|conn| count_rows(conn, spec))?)
    }

    #[instrument(skip(self, spec), fields(table = %spec.table(), relations = spec.relations().len()))]
    fn fetch(&self, spec: &QuerySpec) -> TabulaResult<Vec<RawRow>> {
        Ok(self.with_conn(|conn| fetch_rows(conn, spec))?)
    }
}
