use crate::{database::ScalarValue, error::PropertyQueryError, property::{aggregators::Accumulator, AggregationResult}};

/// Mean in f64. Never fails: NaN input or an infinite running sum make it NaN.
#[derive(Debug, Default)]
pub struct AvgAcc {
    sum: f64,
    count: u64,
    not_a_number: bool,
}

impl Accumulator for AvgAcc {
    fn update(&mut self, value: &ScalarValue) -> Result<(), PropertyQueryError> {
        let v = value.as_f64().ok_or_else(|| {
            PropertyQueryError::configuration(format!("avg got non numeric value {value:?}"))
        })?;
        self.sum += v;
        self.count += 1;
        if !self.sum.is_finite() {
            self.not_a_number = true;
        }
        Ok(())
    }

    fn finalize(&self) -> Result<AggregationResult, PropertyQueryError> {
        let avg = match self.count {
            0 => 0.0,
            _ if self.not_a_number => f64::NAN,
            n => self.sum / n as f64,
        };
        Ok(AggregationResult::Average(avg))
    }
}
