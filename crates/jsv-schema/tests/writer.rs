//! Writing loaded graphs back out in a chosen draft's dialect.

use jsv_core::{Draft, JsonNumber};
use jsv_schema::{write_graph, LoaderConfig, SchemaError, SchemaLoader};
use serde_json::{json, Value};

fn load(draft: Draft, schema: Value) -> jsv_schema::SchemaGraph {
    SchemaLoader::new(LoaderConfig::default().with_default_draft(draft))
        .load(&schema)
        .unwrap()
        .graph
}

#[test]
fn draft6_schema_rewrites_for_draft4() {
    let graph = load(
        Draft::Draft6,
        json!({
            "type": "object",
            "properties": {"n": {"exclusiveMinimum": 0, "const": "x"}},
            "required": ["n"]
        }),
    );
    let written = write_graph(&graph, Draft::Draft4).unwrap();
    assert_eq!(written["$schema"], "http://json-schema.org/draft-04/schema#");
    assert_eq!(written["properties"]["n"]["minimum"], json!(0));
    assert_eq!(written["properties"]["n"]["exclusiveMinimum"], json!(true));
    assert_eq!(written["properties"]["n"]["enum"], json!(["x"]));

    let reloaded = load(Draft::Draft6, written);
    let n = reloaded.schema(reloaded.root_schema().expect_property("n").unwrap());
    assert_eq!(
        n.number().unwrap().exclusive_minimum,
        Some(JsonNumber::parse("0").unwrap())
    );
    assert_eq!(reloaded.root_schema().object().unwrap().required, vec!["n"]);
}

#[test]
fn declaration_order_survives_writing() {
    let schema: Value = serde_json::from_str(
        r#"{
            "properties": {"zeta": {}, "alpha": {"type": "string"}, "mid": {}},
            "dependencies": {"zeta": ["mid"], "alpha": {"required": ["zeta"]}}
        }"#,
    )
    .unwrap();
    let graph = load(Draft::Draft6, schema);
    let written = write_graph(&graph, Draft::Draft6).unwrap();

    let keys = |v: &Value| v.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
    assert_eq!(keys(&written["properties"]), vec!["zeta", "alpha", "mid"]);
    assert_eq!(keys(&written["dependencies"]), vec!["zeta", "alpha"]);

    let object = graph.root_schema().object().unwrap();
    let names: Vec<&str> = object.properties.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn both_bounds_on_one_side_have_no_draft4_spelling() {
    let graph = load(Draft::Draft6, json!({"minimum": 1, "exclusiveMinimum": 0}));
    let err = write_graph(&graph, Draft::Draft4).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::IncompatibleDraft { draft: Draft::Draft4, .. }
    ));
    assert!(write_graph(&graph, Draft::Draft6).is_ok());
}

#[test]
fn draft6_only_keywords_are_incompatible_with_draft4() {
    let graph = load(Draft::Draft6, json!({"contains": {"type": "string"}}));
    let err = write_graph(&graph, Draft::Draft4).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::IncompatibleDraft { ref keyword, .. } if keyword == "contains"
    ));
}

#[test]
fn draft3_required_moves_into_property_schemas() {
    let graph = load(
        Draft::Draft4,
        json!({
            "properties": {"a": {"type": "string"}},
            "required": ["a", "b"],
            "allOf": [{"minProperties": 1}]
        }),
    );
    let err = write_graph(&graph, Draft::Draft3).unwrap_err();
    assert!(matches!(err, SchemaError::IncompatibleDraft { .. }));

    let graph = load(
        Draft::Draft4,
        json!({
            "properties": {"a": {"type": "string"}},
            "required": ["a", "b"],
            "allOf": [{"type": "object"}]
        }),
    );
    let written = write_graph(&graph, Draft::Draft3).unwrap();
    assert_eq!(written["properties"]["a"]["required"], json!(true));
    assert_eq!(written["properties"]["b"], json!({"required": true}));
    assert!(written.get("required").is_none());
    assert_eq!(written["extends"], json!([{"type": "object"}]));
}

#[test]
fn false_schema_per_draft() {
    let graph = load(Draft::Draft6, json!({"items": false}));
    assert_eq!(write_graph(&graph, Draft::Draft6).unwrap()["items"], json!(false));
    assert_eq!(write_graph(&graph, Draft::Draft4).unwrap()["items"], json!({"not": {}}));
    assert_eq!(
        write_graph(&graph, Draft::Draft3).unwrap()["items"],
        json!({"disallow": "any"})
    );
}

#[test]
fn cyclic_graph_writes_a_self_contained_document() {
    let graph = load(
        Draft::Draft6,
        json!({
            "definitions": {
                "node": {
                    "type": "object",
                    "properties": {"next": {"$ref": "#/definitions/node"}}
                }
            },
            "$ref": "#/definitions/node"
        }),
    );
    let written = write_graph(&graph, Draft::Draft6).unwrap();
    let definitions = written["definitions"].as_object().unwrap();
    assert_eq!(definitions.len(), 1);
    let (name, node) = definitions.iter().next().unwrap();
    let pointer = format!("#/definitions/{name}");
    assert_eq!(written["$ref"], json!(pointer));
    assert_eq!(node["properties"]["next"]["$ref"], json!(pointer));

    let reloaded = SchemaLoader::default()
        .with_fetcher(jsv_schema::NoFetch)
        .load(&written)
        .unwrap();
    assert_eq!(reloaded.graph.len(), graph.len());
}

#[test]
fn reference_to_the_root_is_written_as_hash() {
    let graph = load(Draft::Draft4, json!({"items": {"$ref": "#"}}));
    let written = write_graph(&graph, Draft::Draft4).unwrap();
    assert_eq!(written["items"], json!({"$ref": "#"}));
    assert!(written.get("definitions").is_none());
}
