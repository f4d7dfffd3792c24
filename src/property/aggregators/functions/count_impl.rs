use crate::{database::ScalarValue, error::PropertyQueryError, property::{aggregators::Accumulator, AggregationResult}};

/// Counts present values.
#[derive(Debug, Default)]
pub struct CountAcc {
    count: u64,
}

impl Accumulator for CountAcc {
    fn update(&mut self, _value: &ScalarValue) -> Result<(), PropertyQueryError> {
        self.count += 1;
        Ok(())
    }

    fn finalize(&self) -> Result<AggregationResult, PropertyQueryError> {
        Ok(AggregationResult::Count(self.count))
    }
}
