use crate::{database::ScalarValue, error::PropertyQueryError, property::{aggregators::Accumulator, AggregationResult}};

/// Exact sum of bool (0/1) and integer values in 64-bit signed space.
#[derive(Debug, Default)]
pub struct SumAcc {
    sum: i64,
}

impl Accumulator for SumAcc {
    fn update(&mut self, value: &ScalarValue) -> Result<(), PropertyQueryError> {
        let v = value.as_i64().ok_or_else(|| {
            PropertyQueryError::configuration(format!("sum got non integral value {value:?}"))
        })?;
        self.sum = self.sum.checked_add(v).ok_or(PropertyQueryError::overflow(v < 0))?;
        Ok(())
    }

    fn finalize(&self) -> Result<AggregationResult, PropertyQueryError> {
        Ok(AggregationResult::Sum(self.sum))
    }
}

/// Sum in f64. Reaching an infinite total is an overflow error, unless a NaN
/// was seen, which makes the result NaN.
#[derive(Debug, Default)]
pub struct SumDoubleAcc {
    sum: f64,
    saw_nan: bool,
    // sign of the first transition to infinity; true = negative
    overflow: Option<bool>,
}

impl Accumulator for SumDoubleAcc {
    fn update(&mut self, value: &ScalarValue) -> Result<(), PropertyQueryError> {
        let v = value.as_f64().ok_or_else(|| {
            PropertyQueryError::configuration(format!("sum (double) got non numeric value {value:?}"))
        })?;
        if v.is_nan() {
            self.saw_nan = true;
        }
        self.sum += v;
        if self.overflow.is_none() && self.sum.is_infinite() {
            self.overflow = Some(self.sum.is_sign_negative());
        }
        Ok(())
    }

    fn finalize(&self) -> Result<AggregationResult, PropertyQueryError> {
        if self.saw_nan {
            return Ok(AggregationResult::SumAsDouble(f64::NAN));
        }
        match self.overflow {
            Some(negative) => PropertyQueryError::overflow(negative).err(),
            None => Ok(AggregationResult::SumAsDouble(self.sum)),
        }
    }
}
