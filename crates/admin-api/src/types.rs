//! Wire types for the introspection and records endpoints

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A single row, keyed by scalar field name
pub type Record = Map<String, Value>;

/// Scalar type of a model field as reported by introspection.
///
/// Unrecognized type names are kept in `Other` instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    String,
    Int,
    BigInt,
    Float,
    Decimal,
    Boolean,
    DateTime,
    Json,
    Other(String),
}

impl FieldKind {
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::String => "String",
            FieldKind::Int => "Int",
            FieldKind::BigInt => "BigInt",
            FieldKind::Float => "Float",
            FieldKind::Decimal => "Decimal",
            FieldKind::Boolean => "Boolean",
            FieldKind::DateTime => "DateTime",
            FieldKind::Json => "Json",
            FieldKind::Other(name) => name,
        }
    }
}

impl From<&str> for FieldKind {
    fn from(value: &str) -> Self {
        match value {
            "String" => FieldKind::String,
            "Int" => FieldKind::Int,
            "BigInt" => FieldKind::BigInt,
            "Float" => FieldKind::Float,
            "Decimal" => FieldKind::Decimal,
            "Boolean" => FieldKind::Boolean,
            "DateTime" => FieldKind::DateTime,
            "Json" => FieldKind::Json,
            other => FieldKind::Other(other.to_string()),
        }
    }
}

impl From<String> for FieldKind {
    fn from(value: String) -> Self {
        FieldKind::from(value.as_str())
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub name: String,
    #[serde(default)]
    pub scalar_fields: Vec<FieldDescriptor>,
}

impl ModelDescriptor {
    /// Look up a scalar field by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.scalar_fields.iter().find(|f| f.name == name)
    }

    /// Declared kind of a field, `String` when the field is not declared
    pub fn kind_of(&self, name: &str) -> FieldKind {
        self.field(name)
            .map(|f| f.kind.clone())
            .unwrap_or(FieldKind::String)
    }
}

/// Body of the introspection response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Introspection {
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
}

fn default_id_field() -> String {
    "id".to_string()
}

/// One page of records for a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    #[serde(default)]
    pub items: Vec<Record>,
    #[serde(default)]
    pub total: usize,
    #[serde(default = "default_id_field")]
    pub id_field_name: String,
    #[serde(default)]
    pub scalar_fields: Vec<String>,
}

impl Default for RecordPage {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            id_field_name: default_id_field(),
            scalar_fields: Vec::new(),
        }
    }
}

/// Offset window requested from the records endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub model: String,
    pub skip: usize,
    pub take: usize,
}

impl ListQuery {
    pub fn new(model: &str, skip: usize, take: usize) -> Self {
        Self {
            model: model.to_string(),
            skip,
            take,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateBody<'a> {
    pub model: &'a str,
    pub data: &'a Record,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateBody<'a> {
    pub model: &'a str,
    pub id: &'a Value,
    pub data: &'a Record,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteBody<'a> {
    pub model: &'a str,
    pub id: &'a Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_kind_parses_known_and_unknown() {
        let fields: Vec<FieldDescriptor> = serde_json::from_value(json!([
            { "name": "active", "type": "Boolean" },
            { "name": "blob", "type": "Bytes" }
        ]))
        .unwrap();

        assert_eq!(fields[0].kind, FieldKind::Boolean);
        assert_eq!(fields[1].kind, FieldKind::Other("Bytes".to_string()));
        assert_eq!(serde_json::to_value(&fields[1]).unwrap()["type"], "Bytes");
    }

    #[test]
    fn test_record_page_defaults() {
        let page: RecordPage = serde_json::from_value(json!({ "items": [] })).unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.id_field_name, "id");
        assert!(page.scalar_fields.is_empty());
    }

    #[test]
    fn test_kind_of_undeclared_field() {
        let model = ModelDescriptor {
            name: "User".to_string(),
            scalar_fields: vec![FieldDescriptor {
                name: "age".to_string(),
                kind: FieldKind::Int,
            }],
        };
        assert_eq!(model.kind_of("age"), FieldKind::Int);
        assert_eq!(model.kind_of("nickname"), FieldKind::String);
    }
}
