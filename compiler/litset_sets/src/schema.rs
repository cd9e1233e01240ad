//! JSON Schema export.
//!
//! Single-kind sets become `{"type": ..., "enum": [...]}`; mixed kinds
//! become `oneOf` with one alternative per kind (sorted by kind name).
//! Byte strings are a kind of their own, carried as base64 strings with
//! `"format": "byte"`, so text members never pick up the format.
//! Nullability is inferred from a `None` member unless forced.

use base64::Engine;
use litset_ir::LiteralValue;
use serde_json::{json, Map, Value};

use crate::error::EmptySchema;
use crate::namespace::LiteralNamespace;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SchemaOptions {
    /// Defaults to the set name.
    pub title: Option<String>,
    pub description: Option<String>,
    /// `None` infers from the presence of a `None` member.
    pub nullable: Option<bool>,
    /// OpenAPI 3.0 shape (`"nullable": true`) instead of JSON Schema
    /// 2020-12 (`"type": [t, "null"]` or a `null` alternative).
    pub openapi: bool,
}

/// Schema alternative a value belongs to.
fn kind(value: &LiteralValue) -> &'static str {
    match value {
        LiteralValue::None => "null",
        LiteralValue::Bool(_) => "boolean",
        LiteralValue::Int(_) => "integer",
        LiteralValue::Str(_) => "string",
        LiteralValue::Bytes(_) => "bytes",
    }
}

/// `type` (and `format`) keys for one kind.
fn type_keys(kind: &str) -> Map<String, Value> {
    let mut keys = Map::new();
    if kind == "bytes" {
        keys.insert("type".into(), Value::String("string".into()));
        keys.insert("format".into(), Value::String("byte".into()));
    } else {
        keys.insert("type".into(), Value::String(kind.to_owned()));
    }
    keys
}

fn to_json(value: &LiteralValue) -> Value {
    match value {
        LiteralValue::Str(s) => Value::String(s.clone()),
        LiteralValue::Int(n) => Value::from(*n),
        LiteralValue::Bool(b) => Value::Bool(*b),
        LiteralValue::Bytes(bytes) => {
            Value::String(base64::engine::general_purpose::STANDARD.encode(bytes))
        }
        LiteralValue::None => Value::Null,
    }
}

impl LiteralNamespace {
    pub fn json_schema(&self, options: &SchemaOptions) -> Result<Value, EmptySchema> {
        if self.is_empty() {
            return Err(EmptySchema {
                set: self.name().to_owned(),
            });
        }
        let values: Vec<&LiteralValue> = self.iter().collect();
        let nullable = options
            .nullable
            .unwrap_or_else(|| values.iter().any(|v| v.is_none()));

        let mut kinds: Vec<&'static str> = values
            .iter()
            .map(|v| kind(v))
            .filter(|&t| t != "null")
            .collect();
        kinds.sort_unstable();
        kinds.dedup();

        let mut schema = Map::new();
        schema.insert(
            "title".into(),
            Value::String(
                options
                    .title
                    .clone()
                    .unwrap_or_else(|| self.name().to_owned()),
            ),
        );
        if let Some(description) = &options.description {
            schema.insert("description".into(), Value::String(description.clone()));
        }

        let enum_of = |wanted: &str| -> Vec<Value> {
            values
                .iter()
                .filter(|v| kind(v) == wanted)
                .map(|v| to_json(v))
                .collect()
        };

        if let [only] = kinds[..] {
            schema.extend(type_keys(only));
            schema.insert("enum".into(), Value::Array(enum_of(only)));
        } else {
            let alternatives: Vec<Value> = kinds
                .iter()
                .map(|&kind| {
                    let mut alt = type_keys(kind);
                    alt.insert("enum".into(), Value::Array(enum_of(kind)));
                    Value::Object(alt)
                })
                .collect();
            schema.insert("oneOf".into(), Value::Array(alternatives));
        }

        if nullable {
            if options.openapi {
                schema.insert("nullable".into(), Value::Bool(true));
            } else {
                allow_null(&mut schema);
            }
        }
        Ok(Value::Object(schema))
    }
}

fn allow_null(schema: &mut Map<String, Value>) {
    if let Some(Value::Array(alternatives)) = schema.get_mut("oneOf") {
        alternatives.push(json!({ "type": "null" }));
        return;
    }
    if let Some(Value::String(kind)) = schema.get("type") {
        let kinds = json!([kind, "null"]);
        schema.insert("type".into(), kinds);
    }
}
