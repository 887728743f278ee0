use std::sync::Arc;

use datashape::caster::{EnumCaster, ListCaster, ObjectCaster};
use datashape::datatype::{EnumDef, Value};
use datashape::descriptor::{FieldDescriptor, Shape, TypeDescriptor};
use datashape::DataObject;
use serde::Deserialize;
use serde_json::json;

fn status() -> Arc<EnumDef> {
    Arc::new(EnumDef::new("Status").backed("Inactive", 0).backed("Active", 1))
}

struct Person;
impl Shape for Person {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new("Person")
            .field(FieldDescriptor::new("name"))
            .field(FieldDescriptor::new("age").default_value(0))
            .field(FieldDescriptor::new("status").cast_with(EnumCaster::new(&status())))
            .strict()
    }
}

struct Pet;
impl Shape for Pet {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new("Pet")
            .field(FieldDescriptor::new("pet_name").source_alias("petName").output_alias("petName"))
            .field(FieldDescriptor::new("kind").default_value("cat"))
    }
}

struct Owner;
impl Shape for Owner {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new("Owner")
            .field(FieldDescriptor::new("full_name").source_alias("name").output_alias("fullName"))
            .field(FieldDescriptor::new("favourite").cast_with(ObjectCaster::of::<Pet>()).nullable())
            .field(FieldDescriptor::new("pets").cast_with(ListCaster::objects::<Pet>()).default_value(Vec::<Value>::new()))
            .field(FieldDescriptor::new("tags").default_value(Vec::<Value>::new()))
            .strict()
    }
}

fn setup() -> DataObject {
    Owner::construct(json!({
        "name": "Ada",
        "favourite": {"pet_name": "Tom"},
        "pets": [{"pet_name": "Tom"}, {"pet_name": "Rex", "kind": "dog"}],
        "tags": [{"nested": [1, 2]}, "x"]
    }))
    .expect("owner")
}

#[test]
fn person_end_to_end() {
    let ada = Person::construct(json!({"name": "Ada", "status": 1})).expect("person");
    assert_eq!(ada.get("name").and_then(Value::as_str), Some("Ada"));
    assert_eq!(ada.get("age"), Some(&Value::Int(0)));
    let status = ada.get("status").and_then(Value::as_enum).expect("enum");
    assert_eq!(status.to_string(), "Status::Active");
    assert_eq!(ada.to_json().unwrap(), json!({"name": "Ada", "age": 0, "status": 1}));
}

#[test]
fn plain_data_keeps_declaration_order() {
    let ada = Person::construct(json!({"status": 0, "age": 36, "name": "Ada"})).unwrap();
    let plain = ada.to_plain_data(false);
    let keys: Vec<&str> = plain.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["name", "age", "status"]);
}

#[test]
fn output_alias_renames_unless_original_names_kept() {
    let owner = setup();
    let aliased = owner.to_plain_data(false);
    assert!(aliased.contains_key("fullName"));
    assert!(!aliased.contains_key("full_name"));
    let original = owner.to_plain_data(true);
    assert!(original.contains_key("full_name"));
    assert!(!original.contains_key("fullName"));
}

#[test]
fn nested_objects_flatten_with_their_own_aliases() {
    let owner = setup();
    // nested objects always use their own output aliases
    let original = owner.to_plain_data(true);
    assert_eq!(original.get("favourite").map(Value::to_plain), Some(Value::from(json!({"petName": "Tom", "kind": "cat"}))));
    assert_eq!(
        owner.to_json().unwrap(),
        json!({
            "fullName": "Ada",
            "favourite": {"petName": "Tom", "kind": "cat"},
            "pets": [{"petName": "Tom", "kind": "cat"}, {"petName": "Rex", "kind": "dog"}],
            "tags": [{"nested": [1, 2]}, "x"]
        })
    );
}

#[test]
fn plain_data_contains_no_objects_or_enums() {
    fn plain(value: &Value) -> bool {
        match value {
            Value::Object(_) | Value::Enum(_) => false,
            Value::List(items) => items.iter().all(plain),
            Value::Map(map) => map.values().all(plain),
            _ => true,
        }
    }
    let owner = setup();
    assert!(owner.to_plain_data(false).values().all(plain));
    let ada = Person::construct(json!({"name": "Ada", "status": 0})).unwrap();
    assert!(ada.to_plain_data(true).values().all(plain));
}

#[test]
fn unbacked_enum_flattens_to_variant_name() {
    let colour = Arc::new(EnumDef::new("Colour").unit("Red").unit("Blue"));
    let red = EnumDef::variant(&colour, "Red").expect("variant");
    assert_eq!(Value::from(red).to_plain(), Value::from("Red"));
}

#[test]
fn rehydrating_plain_data_is_idempotent() {
    let owner = setup();
    let plain = owner.to_plain_data(true);
    let again = Owner::construct(plain.clone()).expect("rehydrate");
    assert_eq!(again.to_plain_data(true), plain);

    let ada = Person::construct(json!({"name": "Ada", "age": 3, "status": 1})).unwrap();
    let plain = ada.to_plain_data(false);
    assert_eq!(Person::construct(plain.clone()).unwrap().to_plain_data(false), plain);
}

#[derive(Debug, Deserialize, PartialEq)]
struct PetRecord {
    #[serde(rename = "petName")]
    pet_name: String,
    kind: String,
}

#[test]
fn extract_decodes_plain_data() {
    let pet = Pet::construct(json!({"pet_name": "Rex", "kind": "dog"})).unwrap();
    let record: PetRecord = pet.extract().expect("extract");
    assert_eq!(record, PetRecord { pet_name: "Rex".into(), kind: "dog".into() });
}

#[test]
fn serializes_through_serde() {
    let ada = Person::construct(json!({"name": "Ada", "status": 1})).unwrap();
    let text = serde_json::to_string(&ada).unwrap();
    assert_eq!(text, r#"{"name":"Ada","age":0,"status":1}"#);
    assert_eq!(Value::Object(ada).to_string(), r#"Person{"name":"Ada","age":0,"status":1}"#);
}
