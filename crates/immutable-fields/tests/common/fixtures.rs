#![allow(dead_code)]

use immutable_fields::{MemoryDocument, SchemaTree};
use serde_json::{json, Value};

pub fn simple_schema() -> SchemaTree {
    SchemaTree::from_descriptor(&json!({
        "id": "ObjectId",
        "propA": { "type": "String", "immutable": true },
        "propB": "Number"
    }))
    .expect("simple schema")
}

pub fn nested_schema() -> SchemaTree {
    SchemaTree::from_descriptor(&json!({
        "id": "ObjectId",
        "levelA": {
            "levelB": {
                "levelC1": { "type": "String", "immutable": true },
                "levelC2": "String"
            }
        }
    }))
    .expect("nested schema")
}

pub fn array_schema() -> SchemaTree {
    SchemaTree::from_descriptor(&json!({
        "id": "ObjectId",
        "arr": { "immutable": true, "type": [{ "item": "String" }] }
    }))
    .expect("array schema")
}

pub fn mixed_schema() -> SchemaTree {
    SchemaTree::from_descriptor(&json!({
        "id": "ObjectId",
        "parentA": {
            "arr": { "immutable": true, "type": [{ "item": "String" }] },
            "childA": "String",
            "childB": {
                "arr1": { "immutable": true, "type": [{ "item": "String" }] },
                "arr2": { "type": [{ "item": "String" }] }
            },
            "childC": { "type": "String", "immutable": true }
        },
        "parentB": "String",
        "parentC": { "type": "Number", "immutable": true }
    }))
    .expect("mixed schema")
}

pub fn simple_record() -> Value {
    json!({ "id": "5c1a", "propA": "Original", "propB": 1 })
}

pub fn nested_record() -> Value {
    json!({
        "id": "5c1b",
        "levelA": { "levelB": { "levelC1": "Original", "levelC2": "Original" } }
    })
}

pub fn array_record() -> Value {
    json!({ "id": "5c1c", "arr": [{ "item": "1" }, { "item": "2" }] })
}

pub fn mixed_record() -> Value {
    json!({
        "id": "5c1d",
        "parentA": {
            "arr": [{ "item": "a" }],
            "childA": "a",
            "childB": { "arr1": [{ "item": "b1" }], "arr2": [{ "item": "b2" }] },
            "childC": "c"
        },
        "parentB": "b",
        "parentC": 3
    })
}

/// A document as fetched from the store.
pub fn loaded(record: Value) -> MemoryDocument {
    MemoryDocument::from_persisted(record.as_object().cloned().expect("record is an object"))
}
