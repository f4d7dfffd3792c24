use serde::{Deserialize, Serialize};

use crate::property::AggregateOp;

/// Result of an aggregate, tagged by the operation that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AggregationResult {
    Count(u64),
    Sum(i64),
    SumAsDouble(f64),
    Average(f64),
    Min(i64),
    Max(i64),
    MinAsDouble(f64),
    MaxAsDouble(f64),
}

impl AggregationResult {
    pub fn op(&self) -> AggregateOp {
        match self {
            AggregationResult::Count(_) => AggregateOp::Count,
            AggregationResult::Sum(_) => AggregateOp::Sum,
            AggregationResult::SumAsDouble(_) => AggregateOp::SumAsDouble,
            AggregationResult::Average(_) => AggregateOp::Average,
            AggregationResult::Min(_) => AggregateOp::Min,
            AggregationResult::Max(_) => AggregateOp::Max,
            AggregationResult::MinAsDouble(_) => AggregateOp::MinAsDouble,
            AggregationResult::MaxAsDouble(_) => AggregateOp::MaxAsDouble,
        }
    }

    /// Integer-valued results.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AggregationResult::Sum(v) | AggregationResult::Min(v) | AggregationResult::Max(v) => Some(*v),
            AggregationResult::Count(c) => i64::try_from(*c).ok(),
            _ => None,
        }
    }

    /// Floating results.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AggregationResult::SumAsDouble(v)
            | AggregationResult::Average(v)
            | AggregationResult::MinAsDouble(v)
            | AggregationResult::MaxAsDouble(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            AggregationResult::Count(c) => Some(*c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_follow_the_tag() {
        assert_eq!(AggregationResult::Count(3).as_count(), Some(3));
        assert_eq!(AggregationResult::Count(3).as_i64(), Some(3));
        assert_eq!(AggregationResult::Min(-2).as_i64(), Some(-2));
        assert_eq!(AggregationResult::Min(-2).as_f64(), None);
        assert_eq!(AggregationResult::Average(1.5).as_f64(), Some(1.5));
        assert_eq!(AggregationResult::MaxAsDouble(1.0).op(), AggregateOp::MaxAsDouble);
    }
}
