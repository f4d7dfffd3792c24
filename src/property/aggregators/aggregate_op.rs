use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    database::{Property, ScalarType, ScalarValue},
    error::PropertyQueryError,
    property::{
        aggregators::{Accumulator, AvgAcc, CountAcc, DoubleExtremaAcc, ExtremaAcc, Mode, SumAcc, SumDoubleAcc},
        AggregationResult,
    },
};

/// The aggregates a property query can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateOp {
    Count,
    Sum,
    SumAsDouble,
    Average,
    Min,
    Max,
    MinAsDouble,
    MaxAsDouble,
}

impl AggregateOp {
    pub fn name(&self) -> &'static str {
        match self {
            AggregateOp::Count => "count",
            AggregateOp::Sum => "sum",
            AggregateOp::SumAsDouble => "sum (double)",
            AggregateOp::Average => "avg",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
            AggregateOp::MinAsDouble => "min (double)",
            AggregateOp::MaxAsDouble => "max (double)",
        }
    }

    pub fn allows(&self, ty: ScalarType) -> bool {
        match self {
            AggregateOp::Count => true,
            AggregateOp::Sum => ty.is_integral(),
            AggregateOp::SumAsDouble => ty.is_integral() || ty.is_floating(),
            AggregateOp::Average => ty.is_numeric(),
            AggregateOp::Min | AggregateOp::Max => ty.is_integer(),
            AggregateOp::MinAsDouble | AggregateOp::MaxAsDouble => ty.is_floating(),
        }
    }

    /// Reject the op for property types it does not support.
    pub fn check(&self, property: &Property) -> Result<(), PropertyQueryError> {
        if self.allows(property.ty) {
            return Ok(());
        }
        let message = match self {
            AggregateOp::Sum if property.ty.is_floating() => format!(
                "Please use double based sum (e.g. `sum_as_double()`) instead for property {property}"
            ),
            op => format!("Property does not allow {}: {property}", op.name()),
        };
        PropertyQueryError::configuration(message).err()
    }

    pub fn create_accumulator(&self) -> Box<dyn Accumulator> {
        match self {
            AggregateOp::Count => Box::new(CountAcc::default()),
            AggregateOp::Sum => Box::new(SumAcc::default()),
            AggregateOp::SumAsDouble => Box::new(SumDoubleAcc::default()),
            AggregateOp::Average => Box::new(AvgAcc::default()),
            AggregateOp::Min => Box::new(ExtremaAcc::new(Mode::Min)),
            AggregateOp::Max => Box::new(ExtremaAcc::new(Mode::Max)),
            AggregateOp::MinAsDouble => Box::new(DoubleExtremaAcc::new(Mode::Min)),
            AggregateOp::MaxAsDouble => Box::new(DoubleExtremaAcc::new(Mode::Max)),
        }
    }

    /// Fold `values` into a fresh accumulator.
    pub fn aggregate<'v>(&self, values: impl IntoIterator<Item = &'v ScalarValue>) -> Result<AggregationResult, PropertyQueryError> {
        let mut acc = self.create_accumulator();
        for value in values {
            acc.update(value)?;
        }
        acc.finalize()
    }
}

impl Display for AggregateOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TYPES: [ScalarType; 9] = [
        ScalarType::Bool, ScalarType::Byte, ScalarType::Short, ScalarType::Int, ScalarType::Long,
        ScalarType::Float, ScalarType::Double, ScalarType::String, ScalarType::ByteArray,
    ];

    fn allowed(op: AggregateOp) -> Vec<ScalarType> {
        ALL_TYPES.into_iter().filter(|t| op.allows(*t)).collect()
    }

    #[test]
    fn applicability_table() {
        use ScalarType::*;
        assert_eq!(allowed(AggregateOp::Count), ALL_TYPES.to_vec());
        assert_eq!(allowed(AggregateOp::Sum), vec![Bool, Byte, Short, Int, Long]);
        assert_eq!(allowed(AggregateOp::SumAsDouble), vec![Bool, Byte, Short, Int, Long, Float, Double]);
        assert_eq!(allowed(AggregateOp::Average), vec![Byte, Short, Int, Long, Float, Double]);
        assert_eq!(allowed(AggregateOp::Min), vec![Byte, Short, Int, Long]);
        assert_eq!(allowed(AggregateOp::Max), vec![Byte, Short, Int, Long]);
        assert_eq!(allowed(AggregateOp::MinAsDouble), vec![Float, Double]);
        assert_eq!(allowed(AggregateOp::MaxAsDouble), vec![Float, Double]);
    }

    #[test]
    fn sum_on_floating_points_to_double_sum() {
        let p = Property::new(1, "simple_float", ScalarType::Float);
        let msg = AggregateOp::Sum.check(&p).unwrap_err().to_string();
        assert!(msg.contains("Please use double based sum (e.g. `sum_as_double()`) instead for property"));
    }

    #[test]
    fn unsupported_messages_name_the_op() {
        let s = Property::new(1, "simple_string", ScalarType::String);
        assert!(AggregateOp::Average.check(&s).unwrap_err().to_string().contains("Property does not allow avg"));
        assert!(AggregateOp::Sum.check(&s).unwrap_err().to_string().contains("Property does not allow sum"));
        let b = Property::new(2, "simple_boolean", ScalarType::Bool);
        assert!(AggregateOp::Max.check(&b).unwrap_err().to_string().contains("Property does not allow max"));
        let i = Property::new(3, "simple_int", ScalarType::Int);
        assert!(AggregateOp::MinAsDouble.check(&i).unwrap_err().to_string().contains("Property does not allow min (double)"));
    }

    #[test]
    fn aggregate_runs_a_fresh_accumulator() {
        let values = [ScalarValue::Int(2), ScalarValue::Int(3)];
        assert_eq!(AggregateOp::Sum.aggregate(&values).unwrap(), AggregationResult::Sum(5));
        assert_eq!(AggregateOp::Count.aggregate(&values).unwrap(), AggregationResult::Count(2));
        assert_eq!(AggregateOp::Average.aggregate(&values).unwrap(), AggregationResult::Average(2.5));
    }
}
