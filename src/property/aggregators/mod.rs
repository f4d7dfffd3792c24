pub mod accumulator;
pub use accumulator::*;

pub mod aggregate_op;
pub use aggregate_op::*;

pub mod functions;
pub use functions::*;
