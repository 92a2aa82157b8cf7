//! Decoded value tree

use serde::Serialize;

/// A decoded value.
///
/// `Object` keeps its fields as ordered `(name, value)` pairs: sealed
/// fields in trait-declared order, then dynamic members in stream order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    /// 29-bit signed integer
    Integer(i32),
    Double(f64),
    String(String),
    /// Milliseconds since the Unix epoch
    Date(f64),
    Array {
        assoc: Vec<(String, Value)>,
        dense: Vec<Value>,
    },
    Object {
        class_name: String,
        fields: Vec<(String, Value)>,
    },
}

impl Value {
    /// Field lookup on object values
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object { fields, .. } => {
                fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
            }
            _ => None,
        }
    }
}

/// A trait descriptor: class name plus the ordered sealed field names.
///
/// Descriptors are shared by reference across all object instances of the
/// same shape within one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traits {
    pub class_name: String,
    pub field_names: Vec<String>,
    pub dynamic: bool,
}
