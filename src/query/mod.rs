pub mod row_source;
pub use row_source::*;

pub mod condition;
pub use condition::*;

pub mod base_query;
pub use base_query::*;
