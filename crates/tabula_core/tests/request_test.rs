//! Tests for table view request construction.

use serde_json::json;
use std::collections::HashMap;
use tabula_core::{PageLength, SortDirection, TableViewRequest};

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_from_bracket_params() {
    let request = TableViewRequest::from_params(&params(&[
        ("draw", "3"),
        ("search[value]", "foo"),
        ("search[regex]", "false"),
        ("order[0][column]", "2"),
        ("order[0][dir]", "desc"),
        ("start", "20"),
        ("length", "10"),
    ]))
    .unwrap();

    assert_eq!(*request.draw(), 3);
    assert_eq!(request.search_term(), Some("foo"));
    assert_eq!(*request.sort().column_index(), 2);
    assert_eq!(*request.sort().direction(), SortDirection::Desc);
    assert_eq!(*request.page_offset(), 20);
    assert_eq!(*request.page_length(), Some(PageLength::Limit(10)));
}

#[test]
fn test_from_dotted_params() {
    let request = TableViewRequest::from_params(&params(&[
        ("search.value", "bar"),
        ("order.0.column", "1"),
        ("order.0.dir", "ASC"),
        ("length", "-1"),
    ]))
    .unwrap();

    assert_eq!(request.search_term(), Some("bar"));
    assert_eq!(*request.sort().column_index(), 1);
    assert_eq!(*request.sort().direction(), SortDirection::Asc);
    assert_eq!(*request.page_length(), Some(PageLength::All));
}

#[test]
fn test_missing_params_use_defaults() {
    let request = TableViewRequest::from_params(&params(&[])).unwrap();

    assert_eq!(request.search_term(), None);
    assert_eq!(*request.sort().column_index(), 0);
    assert_eq!(*request.sort().direction(), SortDirection::Asc);
    assert_eq!(*request.page_offset(), 0);
    assert_eq!(*request.page_length(), None);
    assert_eq!(*request.draw(), 0);
}

#[test]
fn test_empty_search_is_no_search() {
    let request = TableViewRequest::from_params(&params(&[("search[value]", "")])).unwrap();
    assert_eq!(request.search_term(), None);
}

#[test]
fn test_draw_is_read_leniently() {
    let request = TableViewRequest::from_params(&params(&[("draw", "not-a-number")])).unwrap();
    assert_eq!(*request.draw(), 0);

    let request = TableViewRequest::from_params(&params(&[("draw", "17")])).unwrap();
    assert_eq!(*request.draw(), 17);
}

#[test]
fn test_oversized_draw_clamps() {
    let request =
        TableViewRequest::from_params(&params(&[("draw", "99999999999999999999")])).unwrap();
    assert_eq!(*request.draw(), i64::MAX);

    let request =
        TableViewRequest::from_params(&params(&[("draw", "-99999999999999999999")])).unwrap();
    assert_eq!(*request.draw(), i64::MIN);
}

#[test]
fn test_rejects_bad_direction() {
    let result = TableViewRequest::from_params(&params(&[("order[0][dir]", "sideways")]));
    let err = result.unwrap_err();
    assert!(err.message.contains("sideways"));
}

#[test]
fn test_rejects_negative_length_other_than_sentinel() {
    assert!(TableViewRequest::from_params(&params(&[("length", "-5")])).is_err());
    assert!(TableViewRequest::from_params(&params(&[("length", "ten")])).is_err());
}

#[test]
fn test_rejects_negative_start_and_column() {
    assert!(TableViewRequest::from_params(&params(&[("start", "-1")])).is_err());
    assert!(TableViewRequest::from_params(&params(&[("order[0][column]", "-1")])).is_err());
}

#[test]
fn test_deserialize_structured_body() {
    let request: TableViewRequest = serde_json::from_value(json!({
        "search": {"value": "foo"},
        "order": [{"column": 0, "dir": "asc"}],
        "start": 0,
        "length": 10,
        "draw": 1
    }))
    .unwrap();

    assert_eq!(*request.draw(), 1);
    assert_eq!(request.search_term(), Some("foo"));
    assert_eq!(*request.page_length(), Some(PageLength::Limit(10)));
}

#[test]
fn test_deserialize_accepts_numeric_strings() {
    let request: TableViewRequest = serde_json::from_value(json!({
        "order": [{"column": "3", "dir": "desc"}],
        "start": "5",
        "length": "-1",
        "draw": "9"
    }))
    .unwrap();

    assert_eq!(*request.sort().column_index(), 3);
    assert_eq!(*request.page_offset(), 5);
    assert_eq!(*request.page_length(), Some(PageLength::All));
    assert_eq!(*request.draw(), 9);
}

#[test]
fn test_deserialize_rejects_bad_length() {
    let result = serde_json::from_value::<TableViewRequest>(json!({"length": -7}));
    assert!(result.is_err());
}

#[test]
fn test_builder_defaults() {
    let request = TableViewRequest::builder().draw(5).build().unwrap();
    assert_eq!(*request.draw(), 5);
    assert_eq!(*request.sort().column_index(), 0);
    assert_eq!(*request.page_length(), None);
}
