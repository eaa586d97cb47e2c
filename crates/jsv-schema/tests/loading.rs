//! Loading behavior across drafts: keyword extraction, identifier scopes,
//! reference lookup and diagnostics.

use jsv_core::{Draft, JsonNumber, JsonType};
use jsv_schema::{
    Dependency, DiagnosticKind, InMemoryFetcher, Keyword, LoaderConfig, SchemaError, SchemaLoader,
};
use serde_json::json;

fn loader(draft: Draft) -> SchemaLoader {
    SchemaLoader::new(LoaderConfig::default().with_default_draft(draft))
}

fn num(text: &str) -> JsonNumber {
    JsonNumber::parse(text).unwrap()
}

// ── Numeric bounds ──────────────────────────────────────────────────────

#[test]
fn draft4_boolean_exclusive_folds_into_bound() {
    let loaded = loader(Draft::Draft4)
        .load(&json!({"minimum": 5, "exclusiveMinimum": true, "maximum": 10}))
        .unwrap();
    let n = loaded.graph.root_schema().number().unwrap();
    assert_eq!(n.exclusive_minimum, Some(num("5")));
    assert_eq!(n.minimum, None);
    assert_eq!(n.maximum, Some(num("10")));
    assert!(loaded.report.is_empty());
}

#[test]
fn draft6_numeric_exclusive_is_its_own_bound() {
    let loaded = loader(Draft::Draft6)
        .load(&json!({"minimum": 1, "exclusiveMaximum": 2.5}))
        .unwrap();
    let n = loaded.graph.root_schema().number().unwrap();
    assert_eq!(n.minimum, Some(num("1")));
    assert_eq!(n.exclusive_maximum, Some(num("2.5")));
}

#[test]
fn exclusive_form_must_match_the_draft() {
    let err = loader(Draft::Draft4)
        .load(&json!({"minimum": 1, "exclusiveMinimum": 1}))
        .unwrap_err();
    assert!(matches!(
        err,
        SchemaError::InvalidKeyword { ref keyword, .. } if keyword == "exclusiveMinimum"
    ));

    let err = loader(Draft::Draft6)
        .load(&json!({"exclusiveMinimum": true}))
        .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidKeyword { .. }));
}

#[test]
fn boolean_exclusive_without_bound_is_reported() {
    let loaded = loader(Draft::Draft4)
        .load(&json!({"exclusiveMaximum": true}))
        .unwrap();
    assert!(loaded.graph.root_schema().number().is_none());
    assert_eq!(loaded.report.len(), 1);
    assert_eq!(
        loaded.report.diagnostics()[0].kind,
        DiagnosticKind::MissingKeyword { companion: "maximum".into() }
    );
}

#[test]
fn multiple_of_must_be_positive() {
    let err = loader(Draft::Draft6).load(&json!({"multipleOf": 0})).unwrap_err();
    assert!(err.to_string().contains("multipleOf"));
}

// ── Draft 3 forms ───────────────────────────────────────────────────────

#[test]
fn draft3_forms_load_into_the_common_model() {
    let schema = json!({
        "$schema": "http://json-schema.org/draft-03/schema#",
        "properties": {
            "name": {"type": "string", "required": true},
            "age": {
                "type": ["integer", {"type": "string", "pattern": "^[0-9]+$"}],
                "divisibleBy": 2
            }
        },
        "extends": {"type": "object"},
        "disallow": "array",
        "dependencies": {"age": "name"}
    });
    let loaded = loader(Draft::Draft6).load(&schema).unwrap();
    let graph = &loaded.graph;
    let root = graph.root_schema();

    let object = root.object().unwrap();
    assert_eq!(object.required, vec!["name"]);
    assert_eq!(
        object.dependency("age"),
        Some(&Dependency::Properties(vec!["name".into()]))
    );
    assert!(root
        .keywords()
        .iter()
        .any(|k| matches!(k, Keyword::AllOf(ids) if ids.len() == 1)));
    assert!(root
        .keywords()
        .iter()
        .any(|k| matches!(k, Keyword::Disallow(t) if t.types.contains(JsonType::Array))));

    let age = graph.schema(root.expect_property("age").unwrap());
    assert_eq!(age.number().unwrap().multiple_of, Some(num("2")));
    let union = age
        .keywords()
        .iter()
        .find_map(|k| match k {
            Keyword::Type(t) => Some(t),
            _ => None,
        })
        .unwrap();
    assert!(union.types.contains(JsonType::Integer));
    assert_eq!(union.schemas.len(), 1);
}

#[test]
fn draft3_any_accepts_every_type() {
    let loaded = loader(Draft::Draft3).load(&json!({"type": "any"})).unwrap();
    assert_eq!(loaded.graph.root_schema().types().len(), 7);
    assert!(loader(Draft::Draft4).load(&json!({"type": "any"})).is_err());
}

#[test]
fn boolean_required_in_draft4_is_a_diagnostic() {
    let loaded = loader(Draft::Draft4)
        .load(&json!({"properties": {"a": {"required": true}}}))
        .unwrap();
    assert_eq!(loaded.report.len(), 1);
    assert!(matches!(
        loaded.report.diagnostics()[0].kind,
        DiagnosticKind::TypeMismatch { found: JsonType::Boolean, .. }
    ));
}

// ── Draft 6 forms ───────────────────────────────────────────────────────

#[test]
fn draft6_boolean_schemas_and_new_keywords() {
    let schema: serde_json::Value = serde_json::from_str(
        r#"{
            "properties": {"any": true, "none": false},
            "contains": {"const": 1.0},
            "propertyNames": {"maxLength": 3}
        }"#,
    )
    .unwrap();
    let loaded = loader(Draft::Draft6).load(&schema).unwrap();
    let graph = &loaded.graph;
    let root = graph.root_schema();
    assert!(graph.schema(root.expect_property("any").unwrap()).accepts_everything());
    assert!(graph.schema(root.expect_property("none").unwrap()).is_false());

    let contains = graph.schema(root.array().unwrap().contains.unwrap());
    match &contains.keywords()[0] {
        Keyword::Const(value) => assert_eq!(value.to_string(), "1.0"),
        other => panic!("expected const, found {other:?}"),
    }
    assert!(root.object().unwrap().property_names.is_some());
}

#[test]
fn boolean_schemas_are_rejected_before_draft6() {
    let err = loader(Draft::Draft4)
        .load(&json!({"properties": {"a": true}}))
        .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidSchema { .. }));
    assert!(err.to_string().contains("#/properties/a"));
}

#[test]
fn keywords_from_other_drafts_are_ignored_with_a_diagnostic() {
    let loaded = loader(Draft::Draft4).load(&json!({"const": 3})).unwrap();
    assert!(loaded.graph.root_schema().accepts_everything());
    assert!(matches!(
        loaded.report.diagnostics()[0].kind,
        DiagnosticKind::Ignored { .. }
    ));
}

#[test]
fn explicit_schema_overrides_default_draft() {
    let loaded = loader(Draft::Draft6)
        .load(&json!({
            "$schema": "http://json-schema.org/draft-04/schema#",
            "maximum": 3,
            "exclusiveMaximum": true
        }))
        .unwrap();
    assert_eq!(
        loaded.graph.root_schema().number().unwrap().exclusive_maximum,
        Some(num("3"))
    );
}

// ── References and identifiers ─────────────────────────────────────────

#[test]
fn ref_siblings_are_ignored() {
    let loaded = loader(Draft::Draft6)
        .load(&json!({
            "definitions": {"s": {"type": "string"}},
            "properties": {"a": {"$ref": "#/definitions/s", "type": "integer"}}
        }))
        .unwrap();
    let graph = &loaded.graph;
    let a = graph.schema(graph.root_schema().expect_property("a").unwrap());
    assert_eq!(a.keywords().len(), 1);
    let target = graph.schema(a.reference().unwrap().target);
    assert!(target.types().contains(JsonType::String));
    assert!(!target.types().contains(JsonType::Integer));
}

#[test]
fn relative_ids_change_the_resolution_scope() {
    let schema = json!({
        "$id": "http://example.com/root.json",
        "items": {"$id": "folder/", "items": {"$ref": "item.json"}}
    });
    let fetcher = InMemoryFetcher::new()
        .with("http://example.com/folder/item.json", json!({"type": "integer"}));
    let loaded = SchemaLoader::default().with_fetcher(fetcher).load(&schema).unwrap();
    let id = loaded
        .graph
        .find("http://example.com/folder/item.json")
        .expect("fetched document is part of the graph");
    assert!(loaded.graph.schema(id).types().contains(JsonType::Integer));
}

#[test]
fn plain_name_fragments_resolve_through_the_identifier_index() {
    let schema = json!({
        "id": "http://example.com/root.json",
        "definitions": {"a": {"id": "#foo", "type": "string"}},
        "properties": {"x": {"$ref": "#foo"}}
    });
    let loaded = loader(Draft::Draft4).load(&schema).unwrap();
    let graph = &loaded.graph;
    let x = graph.schema(graph.root_schema().expect_property("x").unwrap());
    let target = graph.schema(x.reference().unwrap().target);
    assert_eq!(target.unique_uri().as_str(), "http://example.com/root.json#foo");
}

#[test]
fn absolute_id_of_root_is_addressable() {
    let schema = json!({
        "$id": "http://example.com/root.json",
        "definitions": {"n": {"type": "number"}},
        "items": {"$ref": "http://example.com/root.json#/definitions/n"}
    });
    let loaded = SchemaLoader::default()
        .with_fetcher(jsv_schema::NoFetch)
        .load(&schema)
        .unwrap();
    let items = loaded.graph.root_schema().array().unwrap().items.clone();
    assert!(items.is_some());
}

#[test]
fn missing_pointer_target_names_the_missing_key() {
    let err = loader(Draft::Draft6)
        .load(&json!({"definitions": {}, "items": {"$ref": "#/definitions/nope"}}))
        .unwrap_err();
    assert!(matches!(err, SchemaError::UnresolvableRef { .. }));
    assert!(err.to_string().contains("#/definitions: Missing value at key [nope]"));
}

#[test]
fn offline_loader_refuses_to_fetch() {
    let err = SchemaLoader::new(LoaderConfig::default().offline())
        .load(&json!({"$ref": "http://example.com/other.json"}))
        .unwrap_err();
    assert!(matches!(err, SchemaError::UnresolvableRef { .. }));
}

#[test]
fn unknown_documents_fail_to_fetch() {
    let err = SchemaLoader::default()
        .with_fetcher(InMemoryFetcher::new())
        .load(&json!({"$ref": "http://example.com/other.json"}))
        .unwrap_err();
    assert!(matches!(err, SchemaError::Fetch { .. }));
}

#[test]
fn load_path_resolves_sibling_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("root.yaml"),
        "properties:\n  child:\n    $ref: child.json\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("child.json"), r#"{"type": "boolean"}"#).unwrap();

    let loaded = SchemaLoader::default()
        .load_path(&dir.path().join("root.yaml"))
        .unwrap();
    let graph = &loaded.graph;
    let child = graph.schema(graph.root_schema().expect_property("child").unwrap());
    let target = graph.schema(child.reference().unwrap().target);
    assert!(target.types().contains(JsonType::Boolean));
    assert_eq!(target.location().document_uri().scheme(), "file");
}

#[test]
fn invalid_pattern_is_fatal() {
    let err = loader(Draft::Draft6).load(&json!({"pattern": "("})).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidKeyword { ref keyword, .. } if keyword == "pattern"));
}

#[test]
fn wrong_typed_title_is_only_a_diagnostic() {
    let loaded = loader(Draft::Draft6)
        .load(&json!({"title": 3, "type": "string"}))
        .unwrap();
    assert_eq!(loaded.report.len(), 1);
    assert!(loaded.graph.root_schema().title().is_none());
}
