use std::cmp::Ordering;

use regex::Regex;

use crate::{database::{Property, ScalarValue}, error::PropertyQueryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Greater,
    Less,
    StartsWith { case_sensitive: bool },
    /// SQL-style pattern: `%` any run, `_` one char.
    Like,
}

/// One `property <op> parameter` term of a base query.
#[derive(Debug, Clone)]
pub struct Condition {
    pub property: Property,
    pub op: CompareOp,
    pub value: ScalarValue,
    pattern: Option<Regex>,
}

impl Condition {
    pub fn new(property: Property, op: CompareOp, value: ScalarValue) -> Result<Self, PropertyQueryError> {
        let mut condition = Self { property, op, value, pattern: None };
        condition.bind(condition.value.clone())?;
        Ok(condition)
    }

    /// Replace the parameter value, recompiling the pattern for LIKE.
    pub fn bind(&mut self, value: ScalarValue) -> Result<(), PropertyQueryError> {
        let pattern = match self.op {
            CompareOp::Like => {
                let text = value.as_str().ok_or_else(|| {
                    PropertyQueryError::configuration(format!("LIKE on {} needs a string parameter", self.property))
                })?;
                Some(Self::like_regex(text)?)
            }
            CompareOp::StartsWith { .. } if value.as_str().is_none() => {
                return PropertyQueryError::configuration(format!(
                    "starts_with on {} needs a string parameter", self.property
                )).err();
            }
            _ => None,
        };
        self.value = value;
        self.pattern = pattern;
        Ok(())
    }

    fn like_regex(pattern: &str) -> Result<Regex, PropertyQueryError> {
        let mut regex = String::from("^");
        for ch in pattern.chars() {
            match ch {
                '%' => regex.push_str(".*"),
                '_' => regex.push('.'),
                c => regex.push_str(&regex::escape(&c.to_string())),
            }
        }
        regex.push('$');
        Regex::new(&regex).map_err(|e| PropertyQueryError::configuration(format!("invalid LIKE pattern: {e}")))
    }

    /// Evaluate against one slot. Null slots never match.
    pub fn matches(&self, slot: Option<&ScalarValue>) -> bool {
        let Some(value) = slot else { return false };
        match self.op {
            CompareOp::Equal => Self::compare(value, &self.value) == Some(Ordering::Equal),
            CompareOp::NotEqual => Self::compare(value, &self.value).is_some_and(|o| o != Ordering::Equal),
            CompareOp::Greater => Self::compare(value, &self.value) == Some(Ordering::Greater),
            CompareOp::Less => Self::compare(value, &self.value) == Some(Ordering::Less),
            CompareOp::StartsWith { case_sensitive } => match (value.as_str(), self.value.as_str()) {
                (Some(v), Some(prefix)) if case_sensitive => v.starts_with(prefix),
                (Some(v), Some(prefix)) => v.to_lowercase().starts_with(&prefix.to_lowercase()),
                _ => false,
            },
            CompareOp::Like => match (value.as_str(), &self.pattern) {
                (Some(v), Some(re)) => re.is_match(v),
                _ => false,
            },
        }
    }

    /// Integers compare exactly in i64, mixed numerics in f64.
    fn compare(left: &ScalarValue, right: &ScalarValue) -> Option<Ordering> {
        match (left, right) {
            (ScalarValue::String(a), ScalarValue::String(b)) => Some(a.cmp(b)),
            (ScalarValue::ByteArray(a), ScalarValue::ByteArray(b)) => Some(a.cmp(b)),
            (ScalarValue::Bool(a), ScalarValue::Bool(b)) => Some(a.cmp(b)),
            (a, b) if a.scalar_type().is_integer() && b.scalar_type().is_integer() => {
                Some(a.as_i64()?.cmp(&b.as_i64()?))
            }
            (a, b) if a.scalar_type().is_numeric() && b.scalar_type().is_numeric() => {
                a.as_f64()?.partial_cmp(&b.as_f64()?)
            }
            _ => None,
        }
    }
}
