use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared scalar kind of an entity property.
///
/// This is the closed set of types a property can be given at schema
/// definition time. Every per-type rule in the crate (which aggregates are
/// allowed, how values are compared for distinct) is a `match` over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// Boolean
    Bool,
    /// 8-bit signed integer
    Byte,
    /// 16-bit signed integer
    Short,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// UTF-8 string
    String,
    /// Raw bytes
    ByteArray,
}

impl ScalarType {
    /// Bool and the four integer widths: the types summed in 64-bit integer space.
    pub fn is_integral(&self) -> bool {
        matches!(self, ScalarType::Bool | ScalarType::Byte | ScalarType::Short | ScalarType::Int | ScalarType::Long)
    }

    /// Byte, Short, Int or Long.
    pub fn is_integer(&self) -> bool {
        matches!(self, ScalarType::Byte | ScalarType::Short | ScalarType::Int | ScalarType::Long)
    }

    /// Float or Double.
    pub fn is_floating(&self) -> bool {
        matches!(self, ScalarType::Float | ScalarType::Double)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_floating()
    }

    /// Check whether a JSON value has a shape that can be stored under this type.
    /// Integers are accepted for floating types; range checks happen on conversion.
    pub fn accepts_json(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (ScalarType::Bool, Value::Bool(_)) => true,
            (t, Value::Number(n)) if t.is_integer() => n.is_i64(),
            (t, Value::Number(_)) if t.is_floating() => true,
            (ScalarType::String, Value::String(_)) => true,
            (ScalarType::ByteArray, Value::Array(items)) => items.iter().all(|i| i.as_u64().is_some_and(|b| b <= u8::MAX as u64)),
            _ => false,
        }
    }
}

impl Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScalarType::Bool => "Bool",
            ScalarType::Byte => "Byte",
            ScalarType::Short => "Short",
            ScalarType::Int => "Int",
            ScalarType::Long => "Long",
            ScalarType::Float => "Float",
            ScalarType::Double => "Double",
            ScalarType::String => "String",
            ScalarType::ByteArray => "ByteArray",
        };
        f.write_str(name)
    }
}
