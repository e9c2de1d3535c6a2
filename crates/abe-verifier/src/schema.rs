//! Schema-shape model and structural validation.
//!
//! The provenance schema file is the wire contract between provenance
//! producers and this verifier. Only the subset of constraints the contract
//! actually uses is modeled: `type`, `required`, `const`, `properties`, and
//! `items`. Unknown schema keywords are ignored on load; the document side is
//! never ignored — any modeled constraint it violates rejects it.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// A structural violation found while validating a document.
///
/// Validation stops at the first violation; the path identifies the offending
/// field from the document root (`$`).
#[derive(Debug, Error, PartialEq)]
pub enum SchemaViolation {
    /// A field listed in `required` is absent.
    #[error("required field '{path}' is missing")]
    MissingField {
        /// Path of the missing field.
        path: String,
    },
    /// A field's JSON type does not match the schema's `type` constraint.
    #[error("field '{path}' must be of type {expected}")]
    WrongType {
        /// Path of the offending field.
        path: String,
        /// Human-readable expected type(s).
        expected: String,
    },
    /// A field's value differs from the schema's pinned `const` literal.
    #[error("field '{path}' must equal {expected}")]
    ConstMismatch {
        /// Path of the offending field.
        path: String,
        /// The pinned literal the field must equal.
        expected: Value,
    },
}

/// JSON types the schema contract can constrain a value to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// JSON string.
    String,
    /// JSON boolean.
    Boolean,
    /// Any JSON number.
    Number,
    /// JSON number without a fractional part.
    Integer,
    /// JSON object.
    Object,
    /// JSON array.
    Array,
    /// JSON null.
    Null,
}

impl SchemaType {
    fn matches(self, value: &Value) -> bool {
        match self {
            SchemaType::String => value.is_string(),
            SchemaType::Boolean => value.is_boolean(),
            SchemaType::Number => value.is_number(),
            SchemaType::Integer => value.is_i64() || value.is_u64(),
            SchemaType::Object => value.is_object(),
            SchemaType::Array => value.is_array(),
            SchemaType::Null => value.is_null(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Boolean => "boolean",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::Null => "null",
        }
    }
}

/// A `type` constraint: a single type or a union (e.g. `["string", "null"]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeConstraint {
    /// Exactly one acceptable type.
    One(SchemaType),
    /// Any of the listed types is acceptable.
    AnyOf(Vec<SchemaType>),
}

impl TypeConstraint {
    fn matches(&self, value: &Value) -> bool {
        match self {
            TypeConstraint::One(ty) => ty.matches(value),
            TypeConstraint::AnyOf(tys) => tys.iter().any(|ty| ty.matches(value)),
        }
    }

    fn describe(&self) -> String {
        match self {
            TypeConstraint::One(ty) => ty.name().to_string(),
            TypeConstraint::AnyOf(tys) => tys
                .iter()
                .map(|ty| ty.name())
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }
}

/// One node of the schema tree, deserialized from the schema definition file.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaNode {
    /// Acceptable JSON type(s) for the value, if constrained.
    #[serde(rename = "type")]
    pub ty: Option<TypeConstraint>,
    /// Field names that must be present when the value is an object.
    #[serde(default)]
    pub required: Vec<String>,
    /// Pinned literal the value must equal, if constrained.
    #[serde(rename = "const")]
    pub const_value: Option<Value>,
    /// Per-field schemas for object values.
    #[serde(default)]
    pub properties: BTreeMap<String, SchemaNode>,
    /// Element schema for array values.
    pub items: Option<Box<SchemaNode>>,
}

/// Validates a parsed document against a schema.
///
/// Pure function over `(schema, document)`: no I/O, no side effects. Returns
/// the first violation encountered; any violation is sufficient for
/// rejection.
pub fn validate(schema: &SchemaNode, document: &Value) -> Result<(), SchemaViolation> {
    validate_at(schema, document, "$")
}

fn validate_at(node: &SchemaNode, value: &Value, path: &str) -> Result<(), SchemaViolation> {
    if let Some(ty) = &node.ty {
        if !ty.matches(value) {
            return Err(SchemaViolation::WrongType {
                path: path.to_string(),
                expected: ty.describe(),
            });
        }
    }

    if let Some(expected) = &node.const_value {
        if value != expected {
            return Err(SchemaViolation::ConstMismatch {
                path: path.to_string(),
                expected: expected.clone(),
            });
        }
    }

    if let Value::Object(fields) = value {
        for name in &node.required {
            if !fields.contains_key(name) {
                return Err(SchemaViolation::MissingField {
                    path: join(path, name),
                });
            }
        }
        // Fields without a schema entry are opaque and accepted as-is.
        for (name, child) in &node.properties {
            if let Some(field) = fields.get(name) {
                validate_at(child, field, &join(path, name))?;
            }
        }
    }

    if let (Some(item_schema), Value::Array(items)) = (&node.items, value) {
        for (index, item) in items.iter().enumerate() {
            validate_at(item_schema, item, &format!("{path}[{index}]"))?;
        }
    }

    Ok(())
}

fn join(path: &str, field: &str) -> String {
    format!("{path}.{field}")
}
