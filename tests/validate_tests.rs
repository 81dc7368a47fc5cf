use std::collections::BTreeSet;
use std::fs;
use tempfile::tempdir;
use treelens::config::Config;
use treelens::document::parser::parse_json;
use treelens::document::path::Path;
use treelens::file::loader::load_file;
use treelens::introspect::validate;

const EXPERIMENT_SCHEMA: &str = r#"{
    "type": "object",
    "required": ["id", "fecha", "modelo", "dataset", "resultados"],
    "properties": {
        "id": {"type": "string", "pattern": "^EXP-[0-9]+$"},
        "fecha": {"type": "string"},
        "modelo": {
            "type": "object",
            "required": ["nombre"],
            "properties": {"nombre": {"type": "string"}}
        },
        "dataset": {
            "type": "object",
            "properties": {
                "tamaño": {
                    "type": "object",
                    "properties": {"train": {"type": "integer", "minimum": 0}}
                }
            }
        },
        "resultados": {
            "type": "object",
            "properties": {"accuracy": {"type": "number", "minimum": 0, "maximum": 1}}
        }
    }
}"#;

fn at(rendered: &str) -> Path {
    Path::parse(rendered).unwrap()
}

// ============================================================================
// Library Validation Tests
// ============================================================================

#[test]
fn test_valid_experiment() {
    let schema = parse_json(EXPERIMENT_SCHEMA).unwrap();
    let doc = parse_json(
        r#"{
            "id": "EXP-001",
            "fecha": "2025-11-19",
            "modelo": {"nombre": "BERT", "tipo": "clasificacion"},
            "dataset": {"nombre": "IMDB", "tamaño": {"train": 25000}},
            "resultados": {"accuracy": 0.92}
        }"#,
    )
    .unwrap();

    assert!(validate(doc.root(), schema.root()).unwrap().is_empty());
}

#[test]
fn test_invalid_experiment_reports_every_violation() {
    let schema = parse_json(EXPERIMENT_SCHEMA).unwrap();
    let doc = parse_json(
        r#"{
            "id": "EXP001",
            "fecha": "2025-11-19",
            "modelo": {"nombre": "BERT"},
            "dataset": {"nombre": "IMDB", "tamaño": {"train": -100}},
            "resultados": {"accuracy": 1.5}
        }"#,
    )
    .unwrap();

    let violations = validate(doc.root(), schema.root()).unwrap();
    let located: BTreeSet<(String, String)> = violations
        .iter()
        .map(|v| (v.instance_path.to_string(), v.schema_path.to_string()))
        .collect();

    assert_eq!(
        located,
        BTreeSet::from([
            ("id".to_string(), "properties.id.pattern".to_string()),
            (
                "dataset.tamaño.train".to_string(),
                "properties.dataset.properties.tamaño.properties.train.minimum".to_string()
            ),
            (
                "resultados.accuracy".to_string(),
                "properties.resultados.properties.accuracy.maximum".to_string()
            ),
        ])
    );
}

#[test]
fn test_missing_required_field_is_reported_at_parent() {
    let schema = parse_json(EXPERIMENT_SCHEMA).unwrap();
    let doc = parse_json(
        r#"{
            "id": "EXP-002",
            "fecha": "2025-11-20",
            "modelo": {},
            "dataset": {},
            "resultados": {}
        }"#,
    )
    .unwrap();

    let violations = validate(doc.root(), schema.root()).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].instance_path, at("modelo"));
    assert_eq!(violations[0].schema_path, at("properties.modelo.required"));
    assert!(violations[0].message.contains("nombre"));
}

// ============================================================================
// File-Based Validation Tests
// ============================================================================

#[test]
fn test_yaml_schema_against_jsonl_records() {
    let dir = tempdir().unwrap();
    let schema_path = dir.path().join("lectura.schema.yaml");
    fs::write(
        &schema_path,
        "type: array\nitems:\n  type: object\n  required: [sensor_id]\n  properties:\n    temperatura:\n      type: number\n",
    )
    .unwrap();
    let data_path = dir.path().join("sensores.jsonl");
    fs::write(
        &data_path,
        "{\"sensor_id\":\"S1\",\"temperatura\":21.5}\n{\"temperatura\":\"alta\"}\n",
    )
    .unwrap();

    let config = Config::default();
    let schema = load_file(&schema_path, &config).unwrap();
    let doc = load_file(&data_path, &config).unwrap();

    let violations = validate(doc.root(), schema.root()).unwrap();
    let instance_paths: BTreeSet<String> = violations
        .iter()
        .map(|v| v.instance_path.to_string())
        .collect();
    assert_eq!(
        instance_paths,
        BTreeSet::from(["[1]".to_string(), "[1].temperatura".to_string()])
    );
}
