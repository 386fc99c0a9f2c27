//! Tests for the envelope data codecs.

use serde_json::{Map, Value, json};
use tabula_core::{Record, TableData};
use tabula_error::TabulaErrorKind;
use tabula_interface::OutputCodec;
use tabula_processor::{Base64JsonCodec, RawRowsCodec, codec_for, decode_rows};

fn record(value: Value, hidden: &[&str]) -> Record {
    let fields: Map<String, Value> = match value {
        Value::Object(map) => map,
        other => panic!("Expected object, got {}", other),
    };
    let hidden: Vec<String> = hidden.iter().map(|s| s.to_string()).collect();
    Record::new(fields, &hidden)
}

#[test]
fn test_base64_codec_produces_decodable_text() {
    let rows = vec![
        record(json!({"id": 1, "name": "Ada"}), &[]),
        record(json!({"id": 2, "name": "Grace"}), &[]),
    ];

    let data = Base64JsonCodec.encode(rows).unwrap();
    let encoded = data.encoded().expect("encoded payload");

    assert_eq!(
        decode_rows(encoded).unwrap(),
        vec![json!({"id": 1, "name": "Ada"}), json!({"id": 2, "name": "Grace"})]
    );
}

#[test]
fn test_base64_codec_keeps_column_order() {
    let rows = vec![record(json!({"zeta": 1, "alpha": 2}), &[])];
    let data = Base64JsonCodec.encode(rows).unwrap();

    let decoded = decode_rows(data.encoded().unwrap()).unwrap();
    let keys: Vec<&String> = decoded[0].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);
}

#[test]
fn test_empty_page_encodes_empty_array() {
    let data = Base64JsonCodec.encode(Vec::new()).unwrap();
    assert_eq!(data.encoded(), Some("W10="));
    assert!(decode_rows("W10=").unwrap().is_empty());
}

#[test]
fn test_hidden_fields_are_not_encoded() {
    let rows = vec![record(json!({"id": 1, "password": "hunter2"}), &["password"])];
    let data = Base64JsonCodec.encode(rows).unwrap();

    let decoded = decode_rows(data.encoded().unwrap()).unwrap();
    assert_eq!(decoded, vec![json!({"id": 1})]);
}

#[test]
fn test_raw_codec_passes_rows_through() {
    let rows = vec![record(json!({"id": 1}), &[])];
    let data = RawRowsCodec.encode(rows.clone()).unwrap();

    assert_eq!(data, TableData::Rows(rows));
    assert!(data.encoded().is_none());
}

#[test]
fn test_codec_for_selects_by_flag() {
    let rows = vec![record(json!({"id": 1}), &[])];

    assert!(codec_for(true).encode(rows.clone()).unwrap().encoded().is_some());
    assert!(codec_for(false).encode(rows).unwrap().rows().is_some());
}

#[test]
fn test_decode_rejects_bad_payloads() {
    for payload in ["not base64!", "eyJpZCI6MX0="] {
        let err = decode_rows(payload).unwrap_err();
        assert!(
            matches!(err.kind(), TabulaErrorKind::Codec(_)),
            "payload {} gave {}",
            payload,
            err
        );
    }
}
