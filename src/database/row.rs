use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::database::{EntitySchema, PropertyId, RowId, ScalarValue};

/// One stored row. Each slot carries its own null flag (`None`); a slot that
/// was never written reads as null too.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: RowId,
    pub values: IndexMap<PropertyId, Option<ScalarValue>>,
}

impl Row {
    pub fn new(id: RowId) -> Self {
        Self { id, values: IndexMap::new() }
    }

    pub fn get(&self, property: PropertyId) -> Option<&ScalarValue> {
        self.values.get(&property).and_then(|slot| slot.as_ref())
    }

    pub fn is_null(&self, property: PropertyId) -> bool {
        self.get(property).is_none()
    }

    /// Render as a JSON object keyed by property name, id under `id_key`.
    pub fn to_json(&self, schema: &EntitySchema, id_key: &str) -> Value {
        let mut out = Map::new();
        out.insert(id_key.to_string(), Value::from(self.id.0));
        for (name, property) in &schema.properties {
            let value = self.get(property.id).map(ScalarValue::to_json).unwrap_or(Value::Null);
            out.insert(name.clone(), value);
        }
        Value::Object(out)
    }
}
