use tracing::debug;

use crate::{
    database::{Property, ScalarType, ScalarValue},
    error::PropertyQueryError,
    property::{
        AggregateOp, AggregationResult, Deduplicator, Extractor, PropertyQuerySpec, StringOrder,
        UniquenessValidator,
    },
    query::RowSource,
};

/// Post-processing of one property over the rows matched by a base query.
///
/// Configuration calls (`distinct`, `unique`, `null_value`, `reset`) mutate
/// the query in place and can be chained. Terminal calls (`count`, `sum`,
/// `find_strings`, ...) read a fresh snapshot from the base query every time
/// and leave the configuration untouched:
///
/// ```ignore
/// let names = query.property(&name)?.distinct().find_strings()?;
/// let total = query.property(&price)?.sum_as_double()?;
/// ```
///
/// Type mismatches between the operation and the property are reported
/// before the base query is evaluated.
#[derive(Clone)]
pub struct PropertyQuery<S: RowSource> {
    source: S,
    spec: PropertyQuerySpec,
}

impl<S: RowSource> PropertyQuery<S> {
    pub fn new(source: S, property: &Property) -> Result<Self, PropertyQueryError> {
        if !source.supports(property) {
            return PropertyQueryError::configuration(format!(
                "Property {property} is not part of the queried entity"
            )).err();
        }
        Ok(Self { source, spec: PropertyQuerySpec::new(property.clone()) })
    }

    pub fn spec(&self) -> &PropertyQuerySpec {
        &self.spec
    }

    pub fn property(&self) -> &Property {
        &self.spec.property
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Access the base query, e.g. to rebind its parameters between runs.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    // --- configuration ---

    /// Only keep the first occurrence of each value. Strings compare case-insensitively.
    pub fn distinct(&mut self) -> &mut Self {
        self.spec.distinct();
        self
    }

    /// Like [`distinct`](Self::distinct) with an explicit string order; string properties only.
    pub fn distinct_with(&mut self, order: StringOrder) -> Result<&mut Self, PropertyQueryError> {
        self.spec.distinct_with(order)?;
        Ok(self)
    }

    /// Fail terminal calls when more than one value remains.
    pub fn unique(&mut self) -> &mut Self {
        self.spec.unique();
        self
    }

    /// Report `value` for rows where the property is null.
    pub fn null_value(&mut self, value: impl Into<ScalarValue>) -> Result<&mut Self, PropertyQueryError> {
        self.spec.null_value(value.into())?;
        Ok(self)
    }

    /// Back to no distinct, no unique, no null value.
    pub fn reset(&mut self) -> &mut Self {
        self.spec.reset();
        self
    }

    // --- pipeline ---

    fn values(&self, operation: &str) -> Result<Vec<ScalarValue>, PropertyQueryError> {
        let snapshot = self.source.snapshot()?;
        let sequence = Extractor::extract(&snapshot, &self.spec)?;
        let rows = sequence.len();

        let sequence = if self.spec.distinct {
            Deduplicator::distinct(sequence, self.spec.case_sensitive())
        } else {
            sequence
        };
        let values = sequence.into_present();
        if self.spec.unique {
            UniquenessValidator::ensure_unique(&self.spec.property, &values)?;
        }

        debug!(
            property = %self.spec.property.name,
            operation,
            rows,
            values = values.len(),
            distinct = self.spec.distinct,
            unique = self.spec.unique,
            "property query"
        );
        Ok(values)
    }

    // --- aggregates ---

    /// Run any aggregate and return the tagged result.
    pub fn aggregate(&self, op: AggregateOp) -> Result<AggregationResult, PropertyQueryError> {
        op.check(&self.spec.property)?;
        let values = self.values(op.name())?;
        op.aggregate(&values)
    }

    /// Number of present values (after distinct).
    pub fn count(&self) -> Result<u64, PropertyQueryError> {
        Ok(self.aggregate(AggregateOp::Count)?.as_count().unwrap_or_default())
    }

    /// Exact integer sum of bool and integer properties. Fails with
    /// `NumericOverflow` when the sum leaves the i64 range.
    pub fn sum(&self) -> Result<i64, PropertyQueryError> {
        Ok(self.aggregate(AggregateOp::Sum)?.as_i64().unwrap_or_default())
    }

    /// Sum in f64. An infinite total is a `NumericOverflow`; NaN input yields NaN.
    pub fn sum_as_double(&self) -> Result<f64, PropertyQueryError> {
        Ok(self.aggregate(AggregateOp::SumAsDouble)?.as_f64().unwrap_or(f64::NAN))
    }

    /// Mean of numeric properties; 0.0 without values, NaN on NaN input or
    /// infinite intermediate sums.
    pub fn average(&self) -> Result<f64, PropertyQueryError> {
        Ok(self.aggregate(AggregateOp::Average)?.as_f64().unwrap_or(f64::NAN))
    }

    /// Smallest integer value, `i64::MAX` without values.
    pub fn min(&self) -> Result<i64, PropertyQueryError> {
        Ok(self.aggregate(AggregateOp::Min)?.as_i64().unwrap_or(i64::MAX))
    }

    /// Largest integer value, `i64::MIN` without values.
    pub fn max(&self) -> Result<i64, PropertyQueryError> {
        Ok(self.aggregate(AggregateOp::Max)?.as_i64().unwrap_or(i64::MIN))
    }

    /// Smallest floating value, NaN without values.
    pub fn min_as_double(&self) -> Result<f64, PropertyQueryError> {
        Ok(self.aggregate(AggregateOp::MinAsDouble)?.as_f64().unwrap_or(f64::NAN))
    }

    /// Largest floating value, NaN without values.
    pub fn max_as_double(&self) -> Result<f64, PropertyQueryError> {
        Ok(self.aggregate(AggregateOp::MaxAsDouble)?.as_f64().unwrap_or(f64::NAN))
    }

    // --- materialization ---

    fn find_all<T>(&self, ty: ScalarType, convert: fn(ScalarValue) -> Option<T>) -> Result<Vec<T>, PropertyQueryError> {
        Extractor::ensure_readable_as(&self.spec.property, ty)?;
        Ok(self.values("find")?.into_iter().filter_map(convert).collect())
    }

    fn find_first<T>(&self, ty: ScalarType, convert: fn(ScalarValue) -> Option<T>) -> Result<Option<T>, PropertyQueryError> {
        Extractor::ensure_readable_as(&self.spec.property, ty)?;
        Ok(self.values("find_first")?.into_iter().next().and_then(convert))
    }

    /// All values regardless of type.
    pub fn find_values(&self) -> Result<Vec<ScalarValue>, PropertyQueryError> {
        self.values("find")
    }

    /// First value regardless of type.
    pub fn find_value(&self) -> Result<Option<ScalarValue>, PropertyQueryError> {
        Ok(self.values("find_first")?.into_iter().next())
    }

    pub fn find_strings(&self) -> Result<Vec<String>, PropertyQueryError> {
        self.find_all(ScalarType::String, ScalarValue::into_string)
    }

    pub fn find_string(&self) -> Result<Option<String>, PropertyQueryError> {
        self.find_first(ScalarType::String, ScalarValue::into_string)
    }

    pub fn find_longs(&self) -> Result<Vec<i64>, PropertyQueryError> {
        self.find_all(ScalarType::Long, ScalarValue::into_long)
    }

    pub fn find_long(&self) -> Result<Option<i64>, PropertyQueryError> {
        self.find_first(ScalarType::Long, ScalarValue::into_long)
    }

    pub fn find_ints(&self) -> Result<Vec<i32>, PropertyQueryError> {
        self.find_all(ScalarType::Int, ScalarValue::into_int)
    }

    pub fn find_int(&self) -> Result<Option<i32>, PropertyQueryError> {
        self.find_first(ScalarType::Int, ScalarValue::into_int)
    }

    pub fn find_shorts(&self) -> Result<Vec<i16>, PropertyQueryError> {
        self.find_all(ScalarType::Short, ScalarValue::into_short)
    }

    pub fn find_short(&self) -> Result<Option<i16>, PropertyQueryError> {
        self.find_first(ScalarType::Short, ScalarValue::into_short)
    }

    pub fn find_bytes(&self) -> Result<Vec<i8>, PropertyQueryError> {
        self.find_all(ScalarType::Byte, ScalarValue::into_byte)
    }

    pub fn find_byte(&self) -> Result<Option<i8>, PropertyQueryError> {
        self.find_first(ScalarType::Byte, ScalarValue::into_byte)
    }

    pub fn find_booleans(&self) -> Result<Vec<bool>, PropertyQueryError> {
        self.find_all(ScalarType::Bool, ScalarValue::into_bool)
    }

    pub fn find_boolean(&self) -> Result<Option<bool>, PropertyQueryError> {
        self.find_first(ScalarType::Bool, ScalarValue::into_bool)
    }

    pub fn find_floats(&self) -> Result<Vec<f32>, PropertyQueryError> {
        self.find_all(ScalarType::Float, ScalarValue::into_float)
    }

    pub fn find_float(&self) -> Result<Option<f32>, PropertyQueryError> {
        self.find_first(ScalarType::Float, ScalarValue::into_float)
    }

    pub fn find_doubles(&self) -> Result<Vec<f64>, PropertyQueryError> {
        self.find_all(ScalarType::Double, ScalarValue::into_double)
    }

    pub fn find_double(&self) -> Result<Option<f64>, PropertyQueryError> {
        self.find_first(ScalarType::Double, ScalarValue::into_double)
    }

    pub fn find_byte_arrays(&self) -> Result<Vec<Vec<u8>>, PropertyQueryError> {
        self.find_all(ScalarType::ByteArray, ScalarValue::into_byte_array)
    }

    pub fn find_byte_array(&self) -> Result<Option<Vec<u8>>, PropertyQueryError> {
        self.find_first(ScalarType::ByteArray, ScalarValue::into_byte_array)
    }
}
