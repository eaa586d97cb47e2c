//! End-to-end behavior: load, validate, render, and share a graph across
//! threads.

use std::thread;

use jsv_core::Draft;
use jsv_schema::{write_graph, KeywordName, LoaderConfig, SchemaError, SchemaLoader};
use jsv_validator::{validate, Validator};
use serde_json::{json, Value};

fn parse(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}

#[test]
fn contains_with_lexical_alternatives() {
    let schema = parse(
        r#"{"contains": {"anyOf": [{"const": 3}, {"const": 4.0}, {"const": "5"}]}}"#,
    );
    let report = validate(&schema, &parse(r#"[24, "Bob", 5]"#)).unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.errors()[0].keyword, Some(KeywordName::Contains));

    assert!(validate(&schema, &parse(r#"[24, "Bob", "5", 3]"#)).unwrap().is_valid());
    assert!(!validate(&schema, &parse("[4]")).unwrap().is_valid());
    assert!(validate(&schema, &parse("[4.0]")).unwrap().is_valid());
}

#[test]
fn draft6_bounds_are_independent() {
    let schema = json!({"maximum": 43, "exclusiveMaximum": 44});
    assert!(validate(&schema, &json!(43)).unwrap().is_valid());
    let report = validate(&schema, &json!(43.5)).unwrap();
    assert_eq!(report.errors()[0].keyword, Some(KeywordName::Maximum));

    let loaded = SchemaLoader::default().load(&schema).unwrap();
    assert!(write_graph(&loaded.graph, Draft::Draft6).is_ok());
    assert!(matches!(
        write_graph(&loaded.graph, Draft::Draft4),
        Err(SchemaError::IncompatibleDraft { .. })
    ));
}

#[test]
fn the_same_pair_is_rejected_under_draft4() {
    let err = SchemaLoader::new(LoaderConfig::default().with_default_draft(Draft::Draft4))
        .load(&json!({"maximum": 43, "exclusiveMaximum": 44}))
        .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidKeyword { .. }));
}

#[test]
fn exclusivity_forms_load_to_the_same_keywords() {
    let draft4 = SchemaLoader::new(LoaderConfig::default().with_default_draft(Draft::Draft4))
        .load(&json!({"minimum": 1, "exclusiveMinimum": true, "maximum": 9}))
        .unwrap()
        .graph;
    let draft6 = SchemaLoader::default()
        .load(&json!({"exclusiveMinimum": 1, "maximum": 9}))
        .unwrap()
        .graph;
    assert_eq!(draft4.root_schema().keywords(), draft6.root_schema().keywords());

    for draft in [Draft::Draft4, Draft::Draft6] {
        let written = write_graph(&draft6, draft).unwrap();
        let reloaded = SchemaLoader::default().load(&written).unwrap().graph;
        assert_eq!(reloaded.root_schema().keywords(), draft6.root_schema().keywords());

        let validator = Validator::new(&reloaded);
        assert!(!validator.is_valid(&json!(1)));
        assert!(validator.is_valid(&json!(1.5)));
    }
}

#[test]
fn report_renders_and_serializes() {
    let schema = json!({
        "properties": {
            "name": {"type": "string"},
            "tags": {"type": "array", "items": {"maxLength": 2}}
        },
        "required": ["name"]
    });
    let report = validate(&schema, &json!({"tags": ["ok", "long"]})).unwrap();
    assert_eq!(report.len(), 2);

    let text = report.to_string();
    assert!(text.starts_with("=== Validation failed: 2 error(s) ==="));
    assert!(text.contains("/tags/1\nKeyword: maxLength\n"));
    assert!(text.contains(
        "(root)\nKeyword: required\nMessage: missing required properties: name\n"
    ));

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["errors"][0]["pointerToViolation"], "/tags/1");
    assert_eq!(value["errors"][1]["code"], "validation.keyword.required");
}

#[test]
fn convenience_validate_surfaces_schema_errors() {
    let err = validate(&json!({"type": 5}), &json!(null)).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidKeyword { .. }));
}

#[test]
fn one_graph_serves_many_threads() {
    let loaded = SchemaLoader::default()
        .load(&json!({
            "type": "array",
            "items": {"type": "integer", "minimum": 0}
        }))
        .unwrap();
    let validator = Validator::new(&loaded.graph);

    let results: Vec<(i64, bool)> = thread::scope(|scope| {
        let handles: Vec<_> = (-4i64..4)
            .map(|n| {
                let validator = &validator;
                scope.spawn(move || (n, validator.is_valid(&json!([1, 2, n]))))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect()
    });
    for (n, valid) in results {
        assert_eq!(valid, n >= 0, "instance with {n}");
    }
}
