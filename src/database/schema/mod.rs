pub mod scalar_type;
pub use scalar_type::*;

pub mod scalar_value;
pub use scalar_value::*;

pub mod property;
pub use property::*;

pub mod entity_schema;
pub use entity_schema::*;
