//! In-memory implementation of the collaborator traits.
//!
//! Tables are plain vectors of JSON objects. Predicates, ordering, windows
//! and relations follow the same rules as the PostgreSQL backend: values
//! are compared through their text form, NULL never matches, and NULL sorts
//! after every other value when ascending.

use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use tabula_core::{EntityDescriptor, Predicate, QuerySpec, RelationDescriptor, SortDirection};
use tabula_error::{DatabaseError, DatabaseErrorKind, TabulaResult};
use tabula_interface::{QueryExecutor, RawRow, SchemaIntrospector};
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
struct MemoryTable {
    columns: Vec<String>,
    rows: Vec<RawRow>,
}

/// Table store held entirely in process memory.
///
/// Counts every schema lookup and query so callers can check how many
/// round trips a pipeline issued.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tabula_processor::InMemoryTableStore;
///
/// let mut store = InMemoryTableStore::new();
/// store
///     .insert_table("users", &["id", "name"], vec![json!({"id": 1, "name": "Ada"})])
///     .unwrap();
/// assert_eq!(store.query_calls(), 0);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryTableStore {
    tables: HashMap<String, MemoryTable>,
    schema_calls: AtomicUsize,
    query_calls: AtomicUsize,
}

impl InMemoryTableStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a table.
    ///
    /// # Errors
    ///
    /// Returns `RowDecode` if a row is not a JSON object.
    pub fn insert_table<S: AsRef<str>>(
        &mut self,
        name: &str,
        columns: &[S],
        rows: Vec<Value>,
    ) -> TabulaResult<&mut Self> {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| match row {
                Value::Object(map) => Ok(map),
                other => Err(DatabaseError::new(DatabaseErrorKind::RowDecode {
                    index,
                    message: format!("table '{}' got {}", name, other),
                })),
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.tables.insert(
            name.to_string(),
            MemoryTable {
                columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
                rows,
            },
        );
        Ok(self)
    }

    /// Schema lookups served so far.
    pub fn schema_calls(&self) -> usize {
        self.schema_calls.load(AtomicOrdering::SeqCst)
    }

    /// Count and fetch queries served so far.
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(AtomicOrdering::SeqCst)
    }

    /// Every storage access served so far.
    pub fn round_trips(&self) -> usize {
        self.schema_calls() + self.query_calls()
    }

    /// Zero both counters.
    pub fn reset_counters(&self) {
        self.schema_calls.store(0, AtomicOrdering::SeqCst);
        self.query_calls.store(0, AtomicOrdering::SeqCst);
    }

    fn table(&self, name: &str) -> Result<&MemoryTable, DatabaseError> {
        self.tables
            .get(name)
            .ok_or_else(|| DatabaseError::new(DatabaseErrorKind::TableNotFound(name.to_string())))
    }

    fn matching(&self, spec: &QuerySpec) -> Result<Vec<&RawRow>, DatabaseError> {
        let table = self.table(spec.table())?;
        let conditions = spec.conditions();
        Ok(table
            .rows
            .iter()
            .filter(|row| conditions.iter().all(|p| matches(p, row)))
            .collect())
    }

    fn attach(&self, row: &mut RawRow, relation: &RelationDescriptor) -> Result<(), DatabaseError> {
        let related = self.table(relation.table())?;
        let key = text_of(row.get(relation.parent_column()));
        let mut hits = related.rows.iter().filter(|candidate| {
            key.is_some() && text_of(candidate.get(relation.related_column())) == key
        });

        let value = if relation.kind().is_many() {
            Value::Array(hits.map(|r| Value::Object(r.clone())).collect())
        } else {
            hits.next()
                .map(|r| Value::Object(r.clone()))
                .unwrap_or(Value::Null)
        };
        row.insert(relation.name().clone(), value);
        Ok(())
    }
}

/// Text form of a value as a `CAST(... AS TEXT)` would produce it.
fn text_of(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    }
}

fn matches(predicate: &Predicate, row: &RawRow) -> bool {
    match predicate {
        Predicate::Equals { column, value } => {
            text_of(row.get(column)).as_deref() == Some(value.as_str())
        }
        Predicate::Contains {
            column,
            needle,
            case_sensitive,
        } => match text_of(row.get(column)) {
            Some(text) if *case_sensitive => text.contains(needle.as_str()),
            Some(text) => text.to_lowercase().contains(&needle.to_lowercase()),
            None => false,
        },
        Predicate::Any(inner) => inner.iter().any(|p| matches(p, row)),
        Predicate::All(inner) => inner.iter().all(|p| matches(p, row)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) => 3,
        Value::Object(_) => 4,
        Value::Null => 5,
    }
}

/// Ascending order with NULL and missing values last.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ if type_rank(a) != type_rank(b) => type_rank(a).cmp(&type_rank(b)),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

impl SchemaIntrospector for InMemoryTableStore {
    #[instrument(skip(self, entity), fields(table = %entity.table()))]
    fn columns_of(&self, entity: &EntityDescriptor) -> TabulaResult<Vec<String>> {
        self.schema_calls.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(self.table(entity.table())?.columns.clone())
    }
}

impl QueryExecutor for InMemoryTableStore {
    #[instrument(skip(self, spec), fields(table = %spec.table()))]
    fn count(&self, spec: &QuerySpec) -> TabulaResult<u64> {
        self.query_calls.fetch_add(1, AtomicOrdering::SeqCst);
        let count = self.matching(spec)?.len() as u64;
        debug!(count, "Counted in-memory rows");
        Ok(count)
    }

    #[instrument(skip(self, spec), fields(table = %spec.table()))]
    fn fetch(&self, spec: &QuerySpec) -> TabulaResult<Vec<RawRow>> {
        self.query_calls.fetch_add(1, AtomicOrdering::SeqCst);
        let mut rows = self.matching(spec)?;

        if let Some(order) = spec.order() {
            rows.sort_by(|a, b| {
                let ordering = compare(a.get(order.column()), b.get(order.column()));
                match order.direction() {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let rows: Vec<&RawRow> = match spec.window() {
            Some(window) => rows
                .into_iter()
                .skip(*window.offset() as usize)
                .take(*window.limit() as usize)
                .collect(),
            None => rows,
        };

        let mut fetched = Vec::with_capacity(rows.len());
        for row in rows {
            let mut row = row.clone();
            for relation in spec.relations() {
                self.attach(&mut row, relation)?;
            }
            fetched.push(row);
        }
        debug!(row_count = fetched.len(), "Fetched in-memory rows");
        Ok(fetched)
    }
}
