//! Encoder integration tests: typed containers into plain JSON objects.

use std::collections::BTreeSet;
use std::sync::Arc;

use attr_json::{
    AttrValue, Attribute, BinaryFormat, CodecOptions, Container, Encoder, Error, Registry,
    ScalarKind, Schema,
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Number, Value};

fn encoder(schemas: Vec<Schema>) -> Encoder {
    let mut registry = Registry::new();
    for schema in schemas {
        registry.register(schema).unwrap();
    }
    Encoder::new(Arc::new(registry))
}

fn encode(encoder: &Encoder, container: &Container) -> Value {
    Value::Object(encoder.encode(container).unwrap())
}

fn pet_model() -> Schema {
    Schema::model("Pet")
        .attribute("name", Attribute::unicode())
        .attribute("age", Attribute::number())
}

fn pet_family(kind: fn(&'static str) -> Schema) -> Vec<Schema> {
    vec![
        kind("Pet").attribute("cls", Attribute::Discriminator),
        kind("Cat")
            .extends("Pet")
            .tag("Cat")
            .attribute("name", Attribute::unicode()),
        kind("Dog")
            .extends("Pet")
            .tag("Dog")
            .attribute("breed", Attribute::unicode()),
    ]
}

#[test]
fn simple_model() {
    let encoder = encoder(vec![pet_model()]);
    let pet = Container::new("Pet").with("name", "Garfield").with("age", 43);
    assert_eq!(encode(&encoder, &pet), json!({"name": "Garfield", "age": 43}));
}

#[test]
fn unset_and_falsy_attributes_are_omitted() {
    let encoder = encoder(vec![pet_model()]);
    let unset = Container::new("Pet").with("name", "Garfield");
    assert_eq!(encode(&encoder, &unset), json!({"name": "Garfield"}));

    let zero = Container::new("Pet").with("name", "Garfield").with("age", 0);
    assert_eq!(encode(&encoder, &zero), json!({"name": "Garfield"}));

    let empty = Container::new("Pet").with("name", "");
    assert_eq!(encode(&encoder, &empty), json!({}));
}

#[test]
fn empty_nested_container_is_omitted() {
    let encoder = encoder(vec![
        Schema::map("Human").attribute("name", Attribute::unicode()),
        pet_model().attribute("owner", Attribute::typed_map("Human")),
    ]);
    let pet = Container::new("Pet")
        .with("name", "Garfield")
        .with("owner", Container::new("Human"));
    assert_eq!(encode(&encoder, &pet), json!({"name": "Garfield"}));

    let pet = Container::new("Pet").with("owner", Container::new("Human").with("name", "Jon"));
    assert_eq!(encode(&encoder, &pet), json!({"owner": {"name": "Jon"}}));
}

#[test]
fn binary_formats() {
    let encoder = encoder(vec![pet_model()
        .attribute("weight", Attribute::legacy_binary())
        .attribute("photo", Attribute::binary())]);
    let pet = Container::new("Pet")
        .with("weight", vec![40u8])
        .with("photo", vec![40u8]);
    assert_eq!(
        encode(&encoder, &pet),
        json!({
            "weight": "KA==",
            "photo": "data:application/octet-stream;base64,KA=="
        })
    );
}

#[test]
fn untyped_list_and_plain_map() {
    let encoder = encoder(vec![pet_model()
        .attribute("likes", Attribute::list())
        .attribute("tags", Attribute::Map)]);
    let mut tags = serde_json::Map::new();
    tags.insert("breed".to_string(), json!("Tabby"));
    let pet = Container::new("Pet")
        .with("likes", vec![AttrValue::from("lasagna"), AttrValue::from(3)])
        .with("tags", tags);
    assert_eq!(
        encode(&encoder, &pet),
        json!({"likes": ["lasagna", 3], "tags": {"breed": "Tabby"}})
    );
}

#[test]
fn dynamic_map_writes_passthrough_keys() {
    let encoder = encoder(vec![
        Schema::dynamic_map("Human")
            .attribute("name", Attribute::unicode())
            .attribute("age", Attribute::number()),
        pet_model().attribute("owner", Attribute::dynamic_map("Human")),
    ]);
    let owner = Container::new("Human")
        .with("name", "Jon")
        .with("age", 70)
        .with_extra("job", json!("Cartoonist"));
    let pet = Container::new("Pet")
        .with("name", "Garfield")
        .with("age", 43)
        .with("owner", owner);
    assert_eq!(
        encode(&encoder, &pet),
        json!({
            "name": "Garfield",
            "age": 43,
            "owner": {"name": "Jon", "age": 70, "job": "Cartoonist"}
        })
    );
}

#[test]
fn typed_list() {
    let encoder = encoder(vec![
        Schema::map("Pet")
            .attribute("name", Attribute::unicode())
            .attribute("age", Attribute::number()),
        Schema::model("Human")
            .attribute("name", Attribute::unicode())
            .attribute("pets", Attribute::list_of(Attribute::typed_map("Pet"))),
    ]);
    let garfield = Container::new("Pet").with("name", "Garfield").with("age", 43);
    let jon = Container::new("Human")
        .with("name", "Jon")
        .with("pets", vec![AttrValue::from(garfield)]);
    assert_eq!(
        encode(&encoder, &jon),
        json!({"name": "Jon", "pets": [{"name": "Garfield", "age": 43}]})
    );
}

#[test]
fn variant_writes_its_tag() {
    let encoder = encoder(pet_family(Schema::model));
    let cat = Container::new("Cat").with("name", "Garfield");
    assert_eq!(encode(&encoder, &cat), json!({"cls": "Cat", "name": "Garfield"}));

    let dog = Container::new("Dog").with("breed", "Terrier");
    assert_eq!(encode(&encoder, &dog), json!({"cls": "Dog", "breed": "Terrier"}));
}

#[test]
fn variant_nested_under_base_schema() {
    let mut schemas = pet_family(Schema::map);
    schemas.push(Schema::model("Human").attribute("pet", Attribute::typed_map("Pet")));
    let encoder = encoder(schemas);
    let jon = Container::new("Human").with("pet", Container::new("Cat").with("name", "Garfield"));
    assert_eq!(
        encode(&encoder, &jon),
        json!({"pet": {"cls": "Cat", "name": "Garfield"}})
    );
}

#[test]
fn unrelated_container_is_a_variant_mismatch() {
    let mut schemas = pet_family(Schema::map);
    schemas.push(Schema::map("Toy").attribute("name", Attribute::unicode()));
    schemas.push(Schema::model("Human").attribute("pet", Attribute::typed_map("Pet")));
    let encoder = encoder(schemas);
    let jon = Container::new("Human").with("pet", Container::new("Toy").with("name", "Pooky"));
    let err = encoder.encode(&jon).unwrap_err();
    assert!(matches!(err, Error::VariantMismatch { .. }));
}

#[test]
fn complex_model_with_dynamic_variants() {
    let mut schemas = pet_family(Schema::dynamic_map);
    schemas.push(
        Schema::model("Human")
            .attribute("name", Attribute::unicode())
            .attribute("pets", Attribute::list_of(Attribute::dynamic_map("Pet"))),
    );
    let encoder = encoder(schemas);
    let garfield = Container::new("Cat").with("name", "Garfield").with("age", 43);
    let odie = Container::new("Dog").with_extra("owner", json!("Jon"));
    let jon = Container::new("Human")
        .with("name", "Jon")
        .with("pets", vec![AttrValue::from(garfield), AttrValue::from(odie)]);
    assert_eq!(
        encode(&encoder, &jon),
        json!({
            "name": "Jon",
            "pets": [
                {"cls": "Cat", "name": "Garfield", "age": 43},
                {"cls": "Dog", "owner": "Jon"}
            ]
        })
    );
}

#[test]
fn all_scalar_kinds() {
    let encoder = encoder(vec![Schema::model("Foo")
        .attribute("binary", Attribute::legacy_binary())
        .attribute(
            "binary_set",
            Attribute::Scalar(ScalarKind::BinarySet(BinaryFormat::Legacy)),
        )
        .attribute("boolean", Attribute::boolean())
        .attribute("json", Attribute::json())
        .attribute("number", Attribute::number())
        .attribute("number_set", Attribute::Scalar(ScalarKind::NumberSet))
        .attribute("ttl", Attribute::Scalar(ScalarKind::Ttl))
        .attribute("unicode", Attribute::unicode())
        .attribute("unicode_set", Attribute::Scalar(ScalarKind::UnicodeSet))
        .attribute("utc_datetime", Attribute::utc_datetime())
        .attribute("version", Attribute::Scalar(ScalarKind::Version))]);
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 15).unwrap();

    let foo = Container::new("Foo")
        .with("binary", vec![0u8])
        .with("binary_set", AttrValue::BytesSet(BTreeSet::from([vec![0]])))
        .with("boolean", true)
        .with("json", AttrValue::Json(json!({"key": "value"})))
        .with("number", 1)
        .with("number_set", AttrValue::NumberSet(vec![Number::from(1)]))
        .with("ttl", now)
        .with("unicode", "foo")
        .with(
            "unicode_set",
            AttrValue::StringSet(BTreeSet::from(["foo".to_string()])),
        )
        .with("utc_datetime", now)
        .with("version", 1);

    assert_eq!(
        encode(&encoder, &foo),
        json!({
            "binary": "AA==",
            "binary_set": ["AA=="],
            "boolean": true,
            "json": r#"{"key":"value"}"#,
            "number": 1,
            "number_set": [1],
            "ttl": 1714566615,
            "unicode": "foo",
            "unicode_set": ["foo"],
            "utc_datetime": "2024-05-01T12:30:15.000000+00:00",
            "version": 1
        })
    );
}

#[test]
fn depth_limit() {
    let mut registry = Registry::new();
    registry
        .register(Schema::map("Node").attribute("child", Attribute::typed_map("Node")))
        .unwrap();
    let registry = Arc::new(registry);

    let mut node = Container::new("Node").with("child", Container::new("Node"));
    node = Container::new("Node").with("child", node);
    node = Container::new("Node").with("child", node);

    let shallow = Encoder::with_options(registry.clone(), CodecOptions { max_depth: 2 });
    assert!(matches!(
        shallow.encode(&node).unwrap_err(),
        Error::DepthExceeded { limit: 2 }
    ));

    // The innermost node is empty and therefore never visited.
    let exact = Encoder::with_options(registry, CodecOptions { max_depth: 3 });
    assert_eq!(
        Value::Object(exact.encode(&node).unwrap()),
        json!({"child": {"child": {}}})
    );
}
