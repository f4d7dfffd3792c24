use crate::{
    database::{Property, ScalarType, ScalarValue},
    error::PropertyQueryError,
    property::PropertyQuerySpec,
    query::RowSnapshot,
};

/// Per-row values of one property, aligned with the matched-row order.
/// `None` marks an absent value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSequence(pub Vec<Option<ScalarValue>>);

impl ValueSequence {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Option<ScalarValue>> {
        self.0.iter()
    }

    /// Present values in order; absent ones are dropped.
    pub fn into_present(self) -> Vec<ScalarValue> {
        self.0.into_iter().flatten().collect()
    }
}

impl FromIterator<Option<ScalarValue>> for ValueSequence {
    fn from_iter<T: IntoIterator<Item = Option<ScalarValue>>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub struct Extractor;

impl Extractor {
    /// Fail unless values of `property` can be read out as `requested`.
    pub fn ensure_readable_as(property: &Property, requested: ScalarType) -> Result<(), PropertyQueryError> {
        if property.ty == requested {
            Ok(())
        } else {
            PropertyQueryError::configuration(format!(
                "Property {property} cannot be read as {requested}"
            )).err()
        }
    }

    /// Read the target property for every matched row, substituting the
    /// configured null value for absent slots.
    pub fn extract<S: RowSnapshot + ?Sized>(snapshot: &S, spec: &PropertyQuerySpec) -> Result<ValueSequence, PropertyQueryError> {
        let property = &spec.property;
        snapshot.matched_rows().iter().map(|row| {
            let value = snapshot.raw_value(*row, property)?;
            if let Some(v) = &value {
                if v.scalar_type() != property.ty {
                    return PropertyQueryError::storage(format!(
                        "Row {row} holds a {} value for property {property}", v.scalar_type()
                    )).err();
                }
            }
            Ok(value.or_else(|| spec.null_value.clone()))
        })
        .collect()
    }
}
