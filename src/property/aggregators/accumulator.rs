use crate::{database::ScalarValue, error::PropertyQueryError, property::AggregationResult};

/// Running state of one aggregate over one terminal call.
///
/// The caller feeds every present value (already deduplicated when distinct
/// is on) through `update`, then calls `finalize` once. Absent values are
/// never passed in.
pub trait Accumulator {
    /// Fold one value into the running state. Integer overflow fails here.
    fn update(&mut self, value: &ScalarValue) -> Result<(), PropertyQueryError>;

    /// Produce the result, or the deferred error (floating overflow).
    fn finalize(&self) -> Result<AggregationResult, PropertyQueryError>;
}
