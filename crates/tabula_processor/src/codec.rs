//! Output codecs for the envelope's `data` field.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tabula_core::{Record, TableData};
use tabula_error::{CodecError, TabulaResult};
use tabula_interface::OutputCodec;

/// Passes the rows through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawRowsCodec;

impl OutputCodec for RawRowsCodec {
    fn encode(&self, rows: Vec<Record>) -> TabulaResult<TableData> {
        Ok(TableData::Rows(rows))
    }
}

/// Serializes the rows to a JSON array, then base64-encodes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64JsonCodec;

impl OutputCodec for Base64JsonCodec {
    fn encode(&self, rows: Vec<Record>) -> TabulaResult<TableData> {
        let json = serde_json::to_vec(&rows).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialize rows");
            CodecError::new(format!("Failed to serialize rows: {}", e))
        })?;
        Ok(TableData::Encoded(STANDARD.encode(json)))
    }
}

static RAW_ROWS: RawRowsCodec = RawRowsCodec;
static BASE64_JSON: Base64JsonCodec = Base64JsonCodec;

/// Codec selected by the `encode_output` flag.
pub fn codec_for(encode_output: bool) -> &'static dyn OutputCodec {
    if encode_output { &BASE64_JSON } else { &RAW_ROWS }
}

/// Inverse of [`Base64JsonCodec`].
///
/// ```
/// use tabula_processor::decode_rows;
///
/// let rows = decode_rows("W3siaWQiOjF9XQ==").unwrap();
/// assert_eq!(rows, vec![serde_json::json!({"id": 1})]);
/// ```
///
/// # Errors
///
/// Returns an error if the text is not base64 or does not hold a JSON array.
pub fn decode_rows(encoded: &str) -> TabulaResult<Vec<Value>> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| CodecError::new(format!("Invalid base64 payload: {}", e)))?;
    let rows = serde_json::from_slice(&bytes)
        .map_err(|e| CodecError::new(format!("Invalid JSON payload: {}", e)))?;
    Ok(rows)
}
