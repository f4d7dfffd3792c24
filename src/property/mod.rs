pub mod query_spec;
pub use query_spec::*;

pub mod extractor;
pub use extractor::*;

pub mod deduplicator;
pub use deduplicator::*;

pub mod aggregators;
pub use aggregators::*;

pub mod aggregation_result;
pub use aggregation_result::*;

pub mod uniqueness;
pub use uniqueness::*;

pub mod property_query;
pub use property_query::*;
