use serde::{Deserialize, Serialize};

use crate::{database::{Property, ScalarType, ScalarValue}, error::PropertyQueryError};

/// How string values are compared by `distinct`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StringOrder {
    /// "BAR" and "bar" are the same value (default).
    #[default]
    CaseInsensitive,
    /// "BAR" and "bar" are different values.
    CaseSensitive,
}

/// Configuration of one property query: the target property plus the
/// distinct/unique/null-replacement flags.
///
/// Mutated in place by chained calls; [`reset`](Self::reset) restores the
/// defaults but keeps the target property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyQuerySpec {
    pub property: Property,
    pub distinct: bool,
    pub string_order: StringOrder,
    pub unique: bool,
    pub null_value: Option<ScalarValue>,
}

impl PropertyQuerySpec {
    pub fn new(property: Property) -> Self {
        Self {
            property,
            distinct: false,
            string_order: StringOrder::default(),
            unique: false,
            null_value: None,
        }
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self.string_order = StringOrder::CaseInsensitive;
        self
    }

    /// Distinct with an explicit string order; only valid for string properties.
    pub fn distinct_with(&mut self, order: StringOrder) -> Result<&mut Self, PropertyQueryError> {
        if self.property.ty != ScalarType::String {
            return PropertyQueryError::configuration(format!(
                "Reserved for string properties, but got {}", self.property
            )).err();
        }
        self.distinct = true;
        self.string_order = order;
        Ok(self)
    }

    pub fn unique(&mut self) -> &mut Self {
        self.unique = true;
        self
    }

    /// Value reported for rows whose slot is null. Must match the property type.
    pub fn null_value(&mut self, value: ScalarValue) -> Result<&mut Self, PropertyQueryError> {
        if value.scalar_type() != self.property.ty {
            return PropertyQueryError::configuration(format!(
                "Null value of type {} does not match property {}", value.scalar_type(), self.property
            )).err();
        }
        self.null_value = Some(value);
        Ok(self)
    }

    pub fn reset(&mut self) -> &mut Self {
        self.distinct = false;
        self.string_order = StringOrder::default();
        self.unique = false;
        self.null_value = None;
        self
    }

    /// Whether strings are compared exactly when deduplicating.
    pub fn case_sensitive(&self) -> bool {
        self.string_order == StringOrder::CaseSensitive
    }
}
