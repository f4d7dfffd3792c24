use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::database::ScalarType;

/// A present, typed value stored in one property slot of a row.
///
/// Absence is never encoded in here; a null slot is `Option::<ScalarValue>::None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    ByteArray(Vec<u8>),
}

impl ScalarValue {
    /// The value a non-nullable slot holds when nothing was written to it.
    pub fn zero(ty: ScalarType) -> Self {
        match ty {
            ScalarType::Bool => ScalarValue::Bool(false),
            ScalarType::Byte => ScalarValue::Byte(0),
            ScalarType::Short => ScalarValue::Short(0),
            ScalarType::Int => ScalarValue::Int(0),
            ScalarType::Long => ScalarValue::Long(0),
            ScalarType::Float => ScalarValue::Float(0.0),
            ScalarType::Double => ScalarValue::Double(0.0),
            ScalarType::String => ScalarValue::String(String::new()),
            ScalarType::ByteArray => ScalarValue::ByteArray(Vec::new()),
        }
    }

    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ScalarValue::Bool(_) => ScalarType::Bool,
            ScalarValue::Byte(_) => ScalarType::Byte,
            ScalarValue::Short(_) => ScalarType::Short,
            ScalarValue::Int(_) => ScalarType::Int,
            ScalarValue::Long(_) => ScalarType::Long,
            ScalarValue::Float(_) => ScalarType::Float,
            ScalarValue::Double(_) => ScalarType::Double,
            ScalarValue::String(_) => ScalarType::String,
            ScalarValue::ByteArray(_) => ScalarType::ByteArray,
        }
    }

    /// Widen bool (as 0/1) and integer values to i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScalarValue::Bool(b) => Some(*b as i64),
            ScalarValue::Byte(v) => Some(*v as i64),
            ScalarValue::Short(v) => Some(*v as i64),
            ScalarValue::Int(v) => Some(*v as i64),
            ScalarValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Widen any bool/integer/floating value to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Float(v) => Some(*v as f64),
            ScalarValue::Double(v) => Some(*v),
            other => other.as_i64().map(|i| i as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_bool(self) -> Option<bool> {
        match self { ScalarValue::Bool(v) => Some(v), _ => None }
    }

    pub fn into_byte(self) -> Option<i8> {
        match self { ScalarValue::Byte(v) => Some(v), _ => None }
    }

    pub fn into_short(self) -> Option<i16> {
        match self { ScalarValue::Short(v) => Some(v), _ => None }
    }

    pub fn into_int(self) -> Option<i32> {
        match self { ScalarValue::Int(v) => Some(v), _ => None }
    }

    pub fn into_long(self) -> Option<i64> {
        match self { ScalarValue::Long(v) => Some(v), _ => None }
    }

    pub fn into_float(self) -> Option<f32> {
        match self { ScalarValue::Float(v) => Some(v), _ => None }
    }

    pub fn into_double(self) -> Option<f64> {
        match self { ScalarValue::Double(v) => Some(v), _ => None }
    }

    pub fn into_string(self) -> Option<String> {
        match self { ScalarValue::String(v) => Some(v), _ => None }
    }

    pub fn into_byte_array(self) -> Option<Vec<u8>> {
        match self { ScalarValue::ByteArray(v) => Some(v), _ => None }
    }

    /// Convert a JSON value into a value of the declared type.
    ///
    /// `Ok(None)` means JSON null. Shape mismatches and out-of-range integers
    /// are reported as `Err` with a short description.
    pub fn from_json(ty: ScalarType, value: &Value) -> Result<Option<ScalarValue>, String> {
        if value.is_null() {
            return Ok(None);
        }
        if !ty.accepts_json(value) {
            return Err(format!("expected {ty}, got {value}"));
        }

        let out_of_range = || format!("{value} is out of range for {ty}");
        let converted = match ty {
            ScalarType::Bool => ScalarValue::Bool(value.as_bool().unwrap_or_default()),
            ScalarType::Byte => ScalarValue::Byte(Self::json_int(value).try_into().map_err(|_| out_of_range())?),
            ScalarType::Short => ScalarValue::Short(Self::json_int(value).try_into().map_err(|_| out_of_range())?),
            ScalarType::Int => ScalarValue::Int(Self::json_int(value).try_into().map_err(|_| out_of_range())?),
            ScalarType::Long => ScalarValue::Long(Self::json_int(value)),
            ScalarType::Float => {
                let wide = value.as_f64().unwrap_or_default();
                let narrow = wide as f32;
                if narrow.is_infinite() && wide.is_finite() {
                    return Err(out_of_range());
                }
                ScalarValue::Float(narrow)
            }
            ScalarType::Double => ScalarValue::Double(value.as_f64().unwrap_or_default()),
            ScalarType::String => ScalarValue::String(value.as_str().unwrap_or_default().to_string()),
            ScalarType::ByteArray => ScalarValue::ByteArray(
                value.as_array()
                    .map(|items| items.iter().filter_map(|b| b.as_u64()).map(|b| b as u8).collect())
                    .unwrap_or_default(),
            ),
        };
        Ok(Some(converted))
    }

    fn json_int(value: &Value) -> i64 {
        value.as_i64().unwrap_or_default()
    }

    /// JSON rendering of the value. Non-finite floats have no JSON form and become null.
    pub fn to_json(&self) -> Value {
        match self {
            ScalarValue::Bool(b) => Value::Bool(*b),
            ScalarValue::Float(f) => Number::from_f64(*f as f64).map(Value::Number).unwrap_or(Value::Null),
            ScalarValue::Double(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            ScalarValue::String(s) => Value::String(s.clone()),
            ScalarValue::ByteArray(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
            integer => integer.as_i64().map(Value::from).unwrap_or(Value::Null),
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self { ScalarValue::Bool(v) }
}

impl From<i8> for ScalarValue {
    fn from(v: i8) -> Self { ScalarValue::Byte(v) }
}

impl From<i16> for ScalarValue {
    fn from(v: i16) -> Self { ScalarValue::Short(v) }
}

impl From<i32> for ScalarValue {
    fn from(v: i32) -> Self { ScalarValue::Int(v) }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self { ScalarValue::Long(v) }
}

impl From<f32> for ScalarValue {
    fn from(v: f32) -> Self { ScalarValue::Float(v) }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self { ScalarValue::Double(v) }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self { ScalarValue::String(v.to_string()) }
}

impl From<String> for ScalarValue {
    fn from(v: String) -> Self { ScalarValue::String(v) }
}

impl From<Vec<u8>> for ScalarValue {
    fn from(v: Vec<u8>) -> Self { ScalarValue::ByteArray(v) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn widening() {
        assert_eq!(ScalarValue::Bool(true).as_i64(), Some(1));
        assert_eq!(ScalarValue::Byte(-3).as_i64(), Some(-3));
        assert_eq!(ScalarValue::Int(i32::MAX).as_f64(), Some(i32::MAX as f64));
        assert_eq!(ScalarValue::String("x".into()).as_i64(), None);
        assert_eq!(ScalarValue::Double(1.5).as_i64(), None);
    }

    #[test]
    fn from_json_respects_declared_type() {
        assert_eq!(ScalarValue::from_json(ScalarType::Short, &json!(104)).unwrap(), Some(ScalarValue::Short(104)));
        assert_eq!(ScalarValue::from_json(ScalarType::Double, &json!(2)).unwrap(), Some(ScalarValue::Double(2.0)));
        assert_eq!(ScalarValue::from_json(ScalarType::String, &Value::Null).unwrap(), None);
        assert!(ScalarValue::from_json(ScalarType::Byte, &json!(300)).is_err());
        assert!(ScalarValue::from_json(ScalarType::Long, &json!("12")).is_err());
    }

    #[test]
    fn from_json_rejects_floats_beyond_f32() {
        let err = ScalarValue::from_json(ScalarType::Float, &json!(1e39)).unwrap_err();
        assert!(err.contains("out of range"));
        assert_eq!(ScalarValue::from_json(ScalarType::Float, &json!(-2.5)).unwrap(), Some(ScalarValue::Float(-2.5)));
        assert_eq!(ScalarValue::from_json(ScalarType::Double, &json!(1e39)).unwrap(), Some(ScalarValue::Double(1e39)));
    }

    #[test]
    fn zero_matches_declared_type() {
        assert_eq!(ScalarValue::zero(ScalarType::Int), ScalarValue::Int(0));
        assert_eq!(ScalarValue::zero(ScalarType::Bool), ScalarValue::Bool(false));
        assert_eq!(ScalarValue::zero(ScalarType::ByteArray).scalar_type(), ScalarType::ByteArray);
    }

    #[test]
    fn to_json_drops_non_finite() {
        assert_eq!(ScalarValue::Double(f64::NAN).to_json(), Value::Null);
        assert_eq!(ScalarValue::Byte(7).to_json(), json!(7));
        assert_eq!(ScalarValue::ByteArray(vec![1, 2]).to_json(), json!([1, 2]));
    }

    #[test]
    fn typed_unwrapping_is_strict() {
        assert_eq!(ScalarValue::Int(5).into_long(), None);
        assert_eq!(ScalarValue::Long(5).into_long(), Some(5));
        assert_eq!(ScalarValue::from("a").into_string(), Some("a".to_string()));
    }
}
