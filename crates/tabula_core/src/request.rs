//! Table view requests as sent by the client-side table widget.
//!
//! A request arrives either as a structured body
//! (`{search:{value}, order:[{column, dir}], start, length, draw}`) or as flat
//! query parameters in bracket (`order[0][column]`) or dotted
//! (`order.0.column`) form. Both paths end in the same validation.

use crate::SortDirection;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use tabula_error::InvalidRequestError;

/// Number of rows requested per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageLength {
    /// Every filtered row, sent on the wire as `-1`
    All,
    /// At most this many rows
    Limit(u64),
}

impl PageLength {
    /// Parse the wire representation, where `-1` means no limit.
    pub fn from_wire(length: i64) -> Result<Self, InvalidRequestError> {
        match length {
            -1 => Ok(PageLength::All),
            n if n >= 0 => Ok(PageLength::Limit(n as u64)),
            n => Err(InvalidRequestError::new(format!(
                "length must be -1 or non-negative, got {}",
                n
            ))),
        }
    }

    /// The row limit, if any.
    pub fn limit(&self) -> Option<u64> {
        match self {
            PageLength::All => None,
            PageLength::Limit(n) => Some(*n),
        }
    }
}

/// Sort column index and direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Getters, derive_new::new)]
pub struct SortSpec {
    /// Index into the entity's column list
    column_index: usize,
    /// Sort direction
    direction: SortDirection,
}

/// One table view request.
///
/// Immutable once built; the processor reads it and discards it.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Getters, Deserialize)]
#[builder(setter(into, strip_option), default)]
#[serde(try_from = "WireRequest")]
pub struct TableViewRequest {
    /// Global search text
    search_value: Option<String>,
    /// Sort column and direction (column 0 ascending when absent)
    sort: SortSpec,
    /// Number of filtered rows to skip
    page_offset: u64,
    /// Rows per page, `None` when the client did not send one (no limit)
    page_length: Option<PageLength>,
    /// Request sequence token echoed in the response
    draw: i64,
}

impl Default for TableViewRequest {
    fn default() -> Self {
        Self {
            search_value: None,
            sort: SortSpec::default(),
            page_offset: 0,
            page_length: None,
            draw: 0,
        }
    }
}

impl TableViewRequest {
    /// Create a new builder for a request.
    pub fn builder() -> TableViewRequestBuilder {
        TableViewRequestBuilder::default()
    }

    /// The search text, if it is non-empty.
    pub fn search_term(&self) -> Option<&str> {
        self.search_value.as_deref().filter(|s| !s.is_empty())
    }

    /// Build a request from flat key/value parameters.
    ///
    /// Keys may use the bracket form (`search[value]`, `order[0][dir]`) or
    /// the dotted form (`search.value`, `order.0.dir`). Only the first
    /// `order` entry is read.
    ///
    /// # Errors
    ///
    /// Returns an error if `start`, `length` or `order[0][column]` is not an
    /// integer in range, or if `order[0][dir]` is not `asc` or `desc`.
    pub fn from_params<K, V>(params: &HashMap<K, V>) -> Result<Self, InvalidRequestError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let normalized: HashMap<String, &str> = params
            .iter()
            .map(|(k, v)| (normalize_key(k.as_ref()), v.as_ref()))
            .collect();
        let get = |key: &str| normalized.get(key).copied();

        RawRequest {
            search: get("search.value"),
            column: get("order.0.column"),
            dir: get("order.0.dir"),
            start: get("start"),
            length: get("length"),
            draw: get("draw"),
        }
        .validate()
    }
}

/// Turns `order[0][column]` into `order.0.column`.
fn normalize_key(key: &str) -> String {
    key.replace("][", ".").replace('[', ".").replace(']', "")
}

/// Unvalidated string view shared by both construction paths.
struct RawRequest<'a> {
    search: Option<&'a str>,
    column: Option<&'a str>,
    dir: Option<&'a str>,
    start: Option<&'a str>,
    length: Option<&'a str>,
    draw: Option<&'a str>,
}

impl RawRequest<'_> {
    fn validate(self) -> Result<TableViewRequest, InvalidRequestError> {
        let column_index = match present(self.column) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                InvalidRequestError::new(format!(
                    "order column must be a non-negative integer, got '{}'",
                    raw
                ))
            })?,
            None => 0,
        };

        let direction = match present(self.dir) {
            Some(raw) => SortDirection::from_str(raw.trim()).map_err(|_| {
                InvalidRequestError::new(format!(
                    "order direction must be 'asc' or 'desc', got '{}'",
                    raw
                ))
            })?,
            None => SortDirection::Asc,
        };

        let page_offset = match present(self.start) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                InvalidRequestError::new(format!(
                    "start must be a non-negative integer, got '{}'",
                    raw
                ))
            })?,
            None => 0,
        };

        let page_length = match present(self.length) {
            Some(raw) => {
                let length = raw.trim().parse::<i64>().map_err(|_| {
                    InvalidRequestError::new(format!("length must be an integer, got '{}'", raw))
                })?;
                Some(PageLength::from_wire(length)?)
            }
            None => None,
        };

        Ok(TableViewRequest {
            search_value: self.search.map(str::to_string),
            sort: SortSpec::new(column_index, direction),
            page_offset,
            page_length,
            draw: self.draw.map(int_value).unwrap_or(0),
        })
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Integer value of a loosely typed token: leading sign and digits, else zero.
/// Values past the `i64` range clamp to its bounds.
fn int_value(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return 0;
    }
    let parsed = if negative {
        format!("-{}", &digits[..end]).parse::<i64>()
    } else {
        digits[..end].parse::<i64>()
    };
    match parsed {
        Ok(n) => n,
        // Only digits remain, so the parse can fail on overflow alone.
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}

#[derive(Debug, Deserialize)]
struct WireSearch {
    #[serde(default)]
    value: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WireOrder {
    #[serde(default)]
    column: Option<Value>,
    #[serde(default)]
    dir: Option<Value>,
}

/// Structured request body; numbers may arrive as JSON numbers or strings.
#[derive(Debug, Deserialize)]
struct WireRequest {
    #[serde(default)]
    search: Option<WireSearch>,
    #[serde(default)]
    order: Vec<WireOrder>,
    #[serde(default)]
    start: Option<Value>,
    #[serde(default)]
    length: Option<Value>,
    #[serde(default)]
    draw: Option<Value>,
}

fn scalar_text(value: &Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    }
}

impl TryFrom<WireRequest> for TableViewRequest {
    type Error = InvalidRequestError;

    fn try_from(wire: WireRequest) -> Result<Self, Self::Error> {
        let search = wire.search.as_ref().and_then(|s| scalar_text(&s.value));
        let first = wire.order.first();
        let column = first.and_then(|o| scalar_text(&o.column));
        let dir = first.and_then(|o| scalar_text(&o.dir));
        let start = scalar_text(&wire.start);
        let length = scalar_text(&wire.length);
        let draw = scalar_text(&wire.draw);

        RawRequest {
            search: search.as_deref(),
            column: column.as_deref(),
            dir: dir.as_deref(),
            start: start.as_deref(),
            length: length.as_deref(),
            draw: draw.as_deref(),
        }
        .validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("order[0][column]"), "order.0.column");
        assert_eq!(normalize_key("search[value]"), "search.value");
        assert_eq!(normalize_key("order.0.dir"), "order.0.dir");
        assert_eq!(normalize_key("draw"), "draw");
    }

    #[test]
    fn test_int_value_is_lenient() {
        assert_eq!(int_value("7"), 7);
        assert_eq!(int_value(" 12abc"), 12);
        assert_eq!(int_value("-3"), -3);
        assert_eq!(int_value("abc"), 0);
        assert_eq!(int_value(""), 0);
        assert_eq!(int_value("-"), 0);
    }

    #[test]
    fn test_int_value_clamps_out_of_range() {
        assert_eq!(int_value("99999999999999999999"), i64::MAX);
        assert_eq!(int_value("-99999999999999999999"), i64::MIN);
        assert_eq!(int_value("9223372036854775807"), i64::MAX);
        assert_eq!(int_value("-9223372036854775808"), i64::MIN);
        assert_eq!(int_value("123456789012345678901x"), i64::MAX);
    }

    #[test]
    fn test_page_length_sentinel() {
        assert_eq!(PageLength::from_wire(-1).unwrap(), PageLength::All);
        assert_eq!(PageLength::from_wire(25).unwrap(), PageLength::Limit(25));
        assert!(PageLength::from_wire(-2).is_err());
        assert_eq!(PageLength::All.limit(), None);
    }
}
