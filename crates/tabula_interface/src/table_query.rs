//! Query execution capability.

use serde_json::{Map, Value};
use std::sync::Arc;
use tabula_core::QuerySpec;
use tabula_error::TabulaResult;

/// A row as produced by storage, before visibility rules are applied.
pub type RawRow = Map<String, Value>;

/// Runs `QuerySpec`s against storage.
///
/// Each call is one round trip. Eager-loaded relations listed in the query
/// come back nested in the row under the relation name.
pub trait QueryExecutor {
    /// Number of rows matching the query's conditions.
    ///
    /// Ordering, window and relations do not affect the count.
    fn count(&self, spec: &QuerySpec) -> TabulaResult<u64>;

    /// Rows matching the query, ordered and windowed.
    fn fetch(&self, spec: &QuerySpec) -> TabulaResult<Vec<RawRow>>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    fn count(&self, spec: &QuerySpec) -> TabulaResult<u64> {
        (**self).count(spec)
    }

    fn fetch(&self, spec: &QuerySpec) -> TabulaResult<Vec<RawRow>> {
        (**self).fetch(spec)
    }
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for Arc<T> {
    fn count(&self, spec: &QuerySpec) -> TabulaResult<u64> {
        (**self).count(spec)
    }

    fn fetch(&self, spec: &QuerySpec) -> TabulaResult<Vec<RawRow>> {
        (**self).fetch(spec)
    }
}
