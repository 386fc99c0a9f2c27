//! Column reflection from `information_schema`.

use crate::DatabaseResult;
use derive_getters::Getters;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Nullable, Text};
use tabula_error::{DatabaseError, DatabaseErrorKind};
use tracing::instrument;

/// One column of a reflected table.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ColumnInfo {
    /// Column name
    name: String,
    /// SQL data type as reported by PostgreSQL
    data_type: String,
    /// Whether NULL is allowed
    nullable: bool,
    /// Declared length for character types
    character_maximum_length: Option<i32>,
}

impl ColumnInfo {
    /// Create a column description.
    pub fn new(
        name: impl Into<String>,
        data_type: impl Into<String>,
        nullable: bool,
        character_maximum_length: Option<i32>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable,
            character_maximum_length,
        }
    }
}

/// Columns of a table in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct TableSchema {
    /// Table name
    table_name: String,
    /// Columns ordered by ordinal position
    columns: Vec<ColumnInfo>,
}

impl TableSchema {
    /// Create a schema from already ordered columns.
    pub fn new(table_name: impl Into<String>, columns: Vec<ColumnInfo>) -> Self {
        Self {
            table_name: table_name.into(),
            columns,
        }
    }

    /// Column names in ordinal order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

#[derive(QueryableByName)]
struct ColumnRow {
    #[diesel(sql_type = Text)]
    column_name: String,
    #[diesel(sql_type = Text)]
    data_type: String,
    #[diesel(sql_type = Text)]
    is_nullable: String,
    #[diesel(sql_type = Nullable<Integer>)]
    character_maximum_length: Option<i32>,
}

const COLUMNS_SQL: &str = "SELECT column_name::text AS column_name, \
     data_type::text AS data_type, \
     is_nullable::text AS is_nullable, \
     character_maximum_length::int4 AS character_maximum_length \
     FROM information_schema.columns \
     WHERE table_schema = current_schema() AND table_name = $1 \
     ORDER BY ordinal_position";

/// Reflect a table's columns from the current schema.
///
/// # Errors
///
/// Returns `TableNotFound` when the table has no columns in the current
/// schema, or a query error if the catalog lookup fails.
#[instrument(name = "database.reflect_table_schema", skip(conn))]
pub fn reflect_table_schema(conn: &mut PgConnection, table: &str) -> DatabaseResult<TableSchema> {
    let rows = diesel::sql_query(COLUMNS_SQL)
        .bind::<Text, _>(table)
        .load::<ColumnRow>(conn)
        .map_err(|e| {
            tracing::error!(error = %e, "Column reflection failed");
            DatabaseError::new(DatabaseErrorKind::Reflection {
                table: table.to_string(),
                message: e.to_string(),
            })
        })?;

    if rows.is_empty() {
        tracing::debug!("Table has no columns in current schema");
        return Err(DatabaseError::new(DatabaseErrorKind::TableNotFound(
            table.to_string(),
        )));
    }

    let columns = rows
        .into_iter()
        .map(|row| {
            ColumnInfo::new(
                row.column_name,
                row.data_type,
                row.is_nullable == "YES",
                row.character_maximum_length,
            )
        })
        .collect::<Vec<_>>();

    tracing::debug!(column_count = columns.len(), "Reflected table schema");
    Ok(TableSchema::new(table, columns))
}
