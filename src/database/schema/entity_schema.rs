use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{database::{Property, PropertyId, ScalarType}, error::PropertyQueryError};

/// Declared properties of one entity, in declaration order.
///
/// Property ids are assigned sequentially starting at 1 when properties are
/// added through [`EntitySchema::with`]. A schema can also be deserialized
/// from JSON, in which case the ids are taken as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Entity name
    pub name: String,
    /// Map of property name -> property
    pub properties: IndexMap<String, Property>,
}

impl EntitySchema {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), properties: IndexMap::new() }
    }

    /// Add a property with the next free id.
    pub fn with(mut self, name: &str, ty: ScalarType) -> Self {
        let next_id = self.properties.values().map(|p| p.id.0).max().unwrap_or(0) + 1;
        self.properties.insert(name.to_string(), Property::new(next_id, name, ty));
        self
    }

    /// Return the property for a name if declared.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn by_id(&self, id: PropertyId) -> Option<&Property> {
        self.properties.values().find(|p| p.id == id)
    }

    /// Like [`get`](Self::get) but a missing property is an error.
    pub fn property(&self, name: &str) -> Result<Property, PropertyQueryError> {
        self.get(name).cloned().ok_or_else(|| {
            PropertyQueryError::configuration(format!("Entity {} has no property {}", self.name, name))
        })
    }

    /// True when `property` is declared here with the same id and type.
    pub fn contains(&self, property: &Property) -> bool {
        self.by_id(property.id).is_some_and(|p| p.same_as(property))
    }

    pub fn from_json_str(text: &str) -> Result<Self, PropertyQueryError> {
        serde_json::from_str(text)
            .map_err(|e| PropertyQueryError::storage(format!("invalid entity schema: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_in_declaration_order() {
        let s = EntitySchema::new("TestEntity")
            .with("simple_string", ScalarType::String)
            .with("simple_int", ScalarType::Int)
            .with("simple_long", ScalarType::Long);
        assert_eq!(s.get("simple_string").unwrap().id, PropertyId(1));
        assert_eq!(s.get("simple_long").unwrap().id, PropertyId(3));
        let names: Vec<_> = s.properties.keys().cloned().collect();
        assert_eq!(names, vec!["simple_string", "simple_int", "simple_long"]);
    }

    #[test]
    fn contains_checks_id_and_type() {
        let s = EntitySchema::new("E").with("a", ScalarType::Int);
        assert!(s.contains(&Property::new(1, "a", ScalarType::Int)));
        assert!(!s.contains(&Property::new(1, "a", ScalarType::Long)));
        assert!(!s.contains(&Property::new(2, "a", ScalarType::Int)));
    }

    #[test]
    fn missing_property_is_configuration_error() {
        let s = EntitySchema::new("E");
        assert!(matches!(s.property("nope"), Err(PropertyQueryError::Configuration(_))));
    }

    #[test]
    fn loads_from_json() {
        let text = r#"{
            "name": "Fruit",
            "properties": {
                "name":  { "id": 1, "name": "name",  "ty": "String" },
                "price": { "id": 2, "name": "price", "ty": "Double", "nullable": false }
            }
        }"#;
        let s = EntitySchema::from_json_str(text).unwrap();
        assert_eq!(s.get("price").unwrap().ty, ScalarType::Double);
        assert!(!s.get("price").unwrap().nullable);
        assert!(EntitySchema::from_json_str("[]").is_err());
    }
}
