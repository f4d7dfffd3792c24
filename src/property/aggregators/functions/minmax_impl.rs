use crate::{database::ScalarValue, error::PropertyQueryError, property::{aggregators::Accumulator, AggregationResult}};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode { Min, Max }

/// Integer extremum in i64. With no input the result is the opposite bound
/// (`i64::MAX` for min, `i64::MIN` for max).
#[derive(Debug)]
pub struct ExtremaAcc {
    mode: Mode,
    current: i64,
}

impl ExtremaAcc {
    pub fn new(mode: Mode) -> Self {
        let current = match mode { Mode::Min => i64::MAX, Mode::Max => i64::MIN };
        Self { mode, current }
    }
}

impl Accumulator for ExtremaAcc {
    fn update(&mut self, value: &ScalarValue) -> Result<(), PropertyQueryError> {
        let v = value.as_i64().ok_or_else(|| {
            PropertyQueryError::configuration(format!("min/max got non integer value {value:?}"))
        })?;
        self.current = match self.mode {
            Mode::Min => self.current.min(v),
            Mode::Max => self.current.max(v),
        };
        Ok(())
    }

    fn finalize(&self) -> Result<AggregationResult, PropertyQueryError> {
        Ok(match self.mode {
            Mode::Min => AggregationResult::Min(self.current),
            Mode::Max => AggregationResult::Max(self.current),
        })
    }
}

/// Floating extremum in f64, starting from NaN. NaN inputs lose every
/// comparison, so the result stays NaN only when no other value was seen.
#[derive(Debug)]
pub struct DoubleExtremaAcc {
    mode: Mode,
    current: f64,
}

impl DoubleExtremaAcc {
    pub fn new(mode: Mode) -> Self {
        Self { mode, current: f64::NAN }
    }
}

impl Accumulator for DoubleExtremaAcc {
    fn update(&mut self, value: &ScalarValue) -> Result<(), PropertyQueryError> {
        let v = value.as_f64().ok_or_else(|| {
            PropertyQueryError::configuration(format!("min/max (double) got non numeric value {value:?}"))
        })?;
        self.current = match self.mode {
            Mode::Min => self.current.min(v),
            Mode::Max => self.current.max(v),
        };
        Ok(())
    }

    fn finalize(&self) -> Result<AggregationResult, PropertyQueryError> {
        Ok(match self.mode {
            Mode::Min => AggregationResult::MinAsDouble(self.current),
            Mode::Max => AggregationResult::MaxAsDouble(self.current),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(mut acc: impl Accumulator, values: &[ScalarValue]) -> AggregationResult {
        for v in values {
            acc.update(v).unwrap();
        }
        acc.finalize().unwrap()
    }

    #[test]
    fn integer_extrema_and_sentinels() {
        let values = [ScalarValue::Short(2101), ScalarValue::Short(2100)];
        assert_eq!(run(ExtremaAcc::new(Mode::Min), &values), AggregationResult::Min(2100));
        assert_eq!(run(ExtremaAcc::new(Mode::Max), &values), AggregationResult::Max(2101));
        assert_eq!(run(ExtremaAcc::new(Mode::Min), &[]), AggregationResult::Min(i64::MAX));
        assert_eq!(run(ExtremaAcc::new(Mode::Max), &[]), AggregationResult::Max(i64::MIN));
    }

    #[test]
    fn double_extrema_and_nan_sentinel() {
        let values = [ScalarValue::Double(2020.01), ScalarValue::Double(2020.0)];
        assert_eq!(run(DoubleExtremaAcc::new(Mode::Min), &values), AggregationResult::MinAsDouble(2020.0));
        assert_eq!(run(DoubleExtremaAcc::new(Mode::Max), &values), AggregationResult::MaxAsDouble(2020.01));
        assert!(run(DoubleExtremaAcc::new(Mode::Min), &[]).as_f64().unwrap().is_nan());
        assert!(run(DoubleExtremaAcc::new(Mode::Max), &[]).as_f64().unwrap().is_nan());
    }

    #[test]
    fn nan_inputs_are_skipped() {
        let values = [ScalarValue::Float(f32::NAN), ScalarValue::Float(1.5), ScalarValue::Float(f32::NAN)];
        assert_eq!(run(DoubleExtremaAcc::new(Mode::Max), &values), AggregationResult::MaxAsDouble(1.5));
    }
}
