pub mod error;
pub use error::PropertyQueryError;

pub mod database;
pub use database::{Collection, Db, DbCommon, EntitySchema, Property, RowId, ScalarType, ScalarValue, StoreConfig};

pub mod query;
pub use query::{Query, QueryBuilder, RowSnapshot, RowSource};

pub mod property;
pub use property::{AggregateOp, AggregationResult, PropertyQuery, PropertyQuerySpec, StringOrder};
