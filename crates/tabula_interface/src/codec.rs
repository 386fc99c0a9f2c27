//! Response payload encoding strategy.

use tabula_core::{Record, TableData};
use tabula_error::TabulaResult;

/// Turns the fetched page into the envelope's `data` field.
///
/// Implementations must be pure: the same rows always produce the same
/// payload, and no query state is consulted.
pub trait OutputCodec {
    /// Encode a page of records.
    fn encode(&self, rows: Vec<Record>) -> TabulaResult<TableData>;
}
