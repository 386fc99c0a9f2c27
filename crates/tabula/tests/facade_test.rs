//! End-to-end tests through the public facade.

use serde_json::json;
use std::collections::HashMap;
use tabula::{
    Entity, EntityDescriptor, EntityRegistry, InMemoryTableStore, ProcessOptions, ProcessorConfig,
    RelationDescriptor, TableQueryProcessor, TableViewRequest, TabulaErrorKind, decode_rows,
};

struct Author;

impl Entity for Author {
    const NAME: &'static str = "Author";

    fn descriptor() -> EntityDescriptor {
        EntityDescriptor::builder()
            .name(Self::NAME)
            .table("authors")
            .hidden_field("api_token")
            .relation(RelationDescriptor::has_one("profile", "profiles", "author_id"))
            .build()
            .expect("valid descriptor")
    }
}

fn create_test_store() -> InMemoryTableStore {
    let mut store = InMemoryTableStore::new();
    store
        .insert_table(
            "authors",
            &["id", "name", "api_token"],
            vec![
                json!({"id": 1, "name": "Ursula", "api_token": "t1"}),
                json!({"id": 2, "name": "Octavia", "api_token": "t2"}),
                json!({"id": 3, "name": "Iain", "api_token": null}),
            ],
        )
        .unwrap();
    store
        .insert_table(
            "profiles",
            &["id", "author_id", "bio"],
            vec![json!({"id": 10, "author_id": 2, "bio": "Parable"})],
        )
        .unwrap();
    store
}

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_query_string_request_end_to_end() {
    let store = create_test_store();
    let mut registry = EntityRegistry::new();
    registry.register::<Author>();
    let processor = TableQueryProcessor::new(registry, &store, &store);

    let request = TableViewRequest::from_params(&params(&[
        ("draw", "7"),
        ("search[value]", "TAV"),
        ("order[0][column]", "1"),
        ("order[0][dir]", "desc"),
        ("start", "0"),
        ("length", "25"),
    ]))
    .unwrap();

    let envelope = processor.process_default(&request, Author::NAME).unwrap();
    let body = serde_json::to_value(&envelope).unwrap();

    assert_eq!(body["draw"], json!(7));
    assert_eq!(body["recordsTotal"], json!(3));
    assert_eq!(body["recordsFiltered"], json!(1));

    let rows = decode_rows(body["data"].as_str().unwrap()).unwrap();
    assert_eq!(rows, vec![json!({"id": 2, "name": "Octavia"})]);
}

#[test]
fn test_raw_rows_and_relations() {
    let store = create_test_store();
    let mut registry = EntityRegistry::new();
    registry.register::<Author>();
    let processor = TableQueryProcessor::new(registry, &store, &store)
        .with_config(ProcessorConfig::default().with_encode_output(false));

    let request = TableViewRequest::from_params(&params(&[("length", "-1")])).unwrap();
    let options = ProcessOptions::builder()
        .relation("profile")
        .encode_output(*processor.config().encode_output())
        .build()
        .unwrap();

    let envelope = processor.process(&request, "Author", &options).unwrap();
    let body = serde_json::to_value(&envelope).unwrap();

    assert_eq!(
        body["data"],
        json!([
            {"id": 1, "name": "Ursula", "profile": null},
            {"id": 2, "name": "Octavia", "profile": {"id": 10, "author_id": 2, "bio": "Parable"}},
            {"id": 3, "name": "Iain", "profile": null},
        ])
    );
}

#[test]
fn test_unregistered_type_is_rejected() {
    let store = create_test_store();
    let processor = TableQueryProcessor::new(EntityRegistry::new(), &store, &store);
    let request = TableViewRequest::builder().build().unwrap();

    let err = processor.process_default(&request, "Author").unwrap_err();

    assert!(matches!(err.kind(), TabulaErrorKind::InvalidEntityType(_)));
    assert!(err.to_string().contains("Author"));
    assert_eq!(store.round_trips(), 0);
}
