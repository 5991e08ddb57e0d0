//! Registries loaded from schema documents on disk.

use std::path::PathBuf;
use std::sync::Arc;

use attr_json::{AttrValue, Decoder, Encoder, Error, Registry, RegistryError, SchemaDocument};
use serde_json::json;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load(name: &str) -> Registry {
    let text = std::fs::read_to_string(fixture(name)).unwrap();
    let document: SchemaDocument = serde_json::from_str(&text).unwrap();
    Registry::from_document(document).unwrap()
}

#[test]
fn fixture_registers_every_schema() {
    let registry = load("pets.json");
    let names: Vec<_> = registry.schemas().map(|s| s.name().to_string()).collect();
    assert_eq!(names, ["Pet", "Cat", "Dog", "Human"]);

    let family = registry.family("Pet").unwrap();
    assert_eq!(family.discriminator(), "cls");
    assert_eq!(family.tags().collect::<Vec<_>>(), ["Cat", "Dog"]);
    assert_eq!(registry.tag_of("Dog"), Some("Dog"));
    assert_eq!(registry.tag_of("Human"), None);
}

#[test]
fn normalizes_a_document() {
    let registry = Arc::new(load("pets.json"));
    let input = json!({
        "name": "Jon",
        "age": 0,
        "born": "1978-06-19T00:00:00Z",
        "job": "Cartoonist",
        "pets": [
            {"cls": "Cat", "name": "Garfield", "weight": "KA==", "lasagna": true},
            {"cls": "Dog", "breed": null}
        ]
    });

    let jon = Decoder::new(registry.clone())
        .decode_value("Human", &input)
        .unwrap();
    let pets = jon.get("pets").and_then(AttrValue::as_list).unwrap();
    let garfield = pets[0].as_container().unwrap();
    assert_eq!(garfield.get("weight"), Some(&AttrValue::Bytes(vec![40])));
    assert_eq!(garfield.extra("lasagna"), Some(&json!(true)));

    let output = Encoder::new(registry).encode(&jon).unwrap();
    assert_eq!(
        serde_json::Value::Object(output),
        json!({
            "name": "Jon",
            "born": "1978-06-19T00:00:00.000000+00:00",
            "pets": [
                {"cls": "Cat", "name": "Garfield", "weight": "KA==", "lasagna": true},
                {"cls": "Dog"}
            ]
        })
    );
}

#[test]
fn unknown_variant_in_a_list() {
    let registry = Arc::new(load("pets.json"));
    let input = json!({"pets": [{"cls": "Ferret"}]});
    let err = Decoder::new(registry)
        .decode_value("Human", &input)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownVariant { tag, .. } if tag == "Ferret"));
}

#[test]
fn rejects_documents_with_dangling_parents() {
    let document: SchemaDocument = serde_json::from_value(json!({
        "schemas": [
            { "name": "Cat", "kind": "map", "extends": "Pet", "tag": "Cat" }
        ]
    }))
    .unwrap();
    assert_eq!(
        Registry::from_document(document).unwrap_err(),
        RegistryError::UnknownParent {
            schema: "Cat".to_string(),
            parent: "Pet".to_string(),
        }
    );
}
