//! Response envelope understood by the client-side table widget.

use crate::Record;
use derive_getters::Getters;
use serde::Serialize;

/// Row payload of a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TableData {
    /// Opaque encoded form of the rows
    Encoded(String),
    /// The rows themselves
    Rows(Vec<Record>),
}

impl TableData {
    /// The rows, when not encoded.
    pub fn rows(&self) -> Option<&[Record]> {
        match self {
            TableData::Rows(rows) => Some(rows),
            TableData::Encoded(_) => None,
        }
    }

    /// The encoded payload, when encoded.
    pub fn encoded(&self) -> Option<&str> {
        match self {
            TableData::Encoded(s) => Some(s),
            TableData::Rows(_) => None,
        }
    }
}

/// Result of one processed request.
///
/// Serializes as `{"draw", "recordsTotal", "recordsFiltered", "data"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, derive_new::new)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    /// Echo of the request's draw token
    draw: i64,
    /// Rows before the search filter
    records_total: u64,
    /// Rows after the search filter, before pagination
    records_filtered: u64,
    /// Page of rows
    data: TableData,
}
