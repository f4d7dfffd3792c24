use tracing::warn;

use crate::{database::{Property, ScalarValue}, error::PropertyQueryError};

pub struct UniquenessValidator;

impl UniquenessValidator {
    /// Fail when more than one value is left. Values are counted as given:
    /// without a preceding distinct pass, equal values in different rows
    /// are separate values.
    pub fn ensure_unique(property: &Property, values: &[ScalarValue]) -> Result<(), PropertyQueryError> {
        if values.len() <= 1 {
            return Ok(());
        }
        warn!(property = %property.name, found = values.len(), "unique property query matched several values");
        PropertyQueryError::DataConsistency(format!(
            "Query for property {property} is not unique: {} values found", values.len()
        )).err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::ScalarType;

    #[test]
    fn zero_or_one_value_passes() {
        let p = Property::new(1, "simple_string", ScalarType::String);
        assert!(UniquenessValidator::ensure_unique(&p, &[]).is_ok());
        assert!(UniquenessValidator::ensure_unique(&p, &["foo".into()]).is_ok());
    }

    #[test]
    fn repeated_value_is_a_violation() {
        let p = Property::new(1, "simple_string", ScalarType::String);
        let err = UniquenessValidator::ensure_unique(&p, &["foo".into(), "foo".into()]).unwrap_err();
        assert!(matches!(err, PropertyQueryError::DataConsistency(_)));
    }
}
