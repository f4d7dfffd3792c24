use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::database::ScalarType;

/// Schema-level identifier of a property, unique within its entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyId(pub u32);

impl Display for PropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A declared entity property: id, name and scalar type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    pub ty: ScalarType,
    /// Whether slots keep a null flag. Non-nullable slots store the type's zero instead.
    #[serde(default = "Property::default_nullable")]
    pub nullable: bool,
}

impl Property {
    pub fn new(id: u32, name: &str, ty: ScalarType) -> Self {
        Self { id: PropertyId(id), name: name.to_string(), ty, nullable: true }
    }

    fn default_nullable() -> bool {
        true
    }

    /// Same id and same declared type.
    pub fn same_as(&self, other: &Property) -> bool {
        self.id == other.id && self.ty == other.ty
    }
}

impl Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.ty)
    }
}
