use std::{fs, io::{BufWriter, Write}, path::Path, sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard}};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{trace, warn};

use crate::{
    database::{EntitySchema, IdManager, PropertyId, Row, RowId, ScalarValue, StoreConfig},
    error::PropertyQueryError,
    query::QueryBuilder,
};

/// Lock-protected in-memory collection.
pub(crate) type ProtectedCollection = RwLock<InternalCollection>;

/// Internal in-memory collection representation.
///
/// Rows are kept in insertion order, which is also the order in which a
/// query reports its matches.
pub(crate) struct InternalCollection {
    rows: IndexMap<RowId, Row>,
    id_manager: IdManager,
    config: StoreConfig,
    /// declared properties of the stored entity
    pub schema: EntitySchema,
}

impl InternalCollection {
    pub fn new(schema: EntitySchema, config: StoreConfig) -> Self {
        Self {
            rows: IndexMap::new(),
            id_manager: IdManager::new(),
            config,
            schema,
        }
    }

    pub fn into_protected(self) -> ProtectedCollection {
        RwLock::new(self)
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }

    pub fn get(&self, id: RowId) -> Option<&Row> {
        self.rows.get(&id)
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn put<I, K>(&mut self, values: I) -> Result<RowId, PropertyQueryError>
    where
        I: IntoIterator<Item = (K, Option<ScalarValue>)>,
        K: AsRef<str>,
    {
        let mut slots = IndexMap::new();
        for (name, value) in values {
            let property = self.schema.get(name.as_ref()).ok_or_else(|| {
                PropertyQueryError::storage(format!("Entity {} has no property {}", self.schema.name, name.as_ref()))
            })?;
            if let Some(v) = &value {
                if v.scalar_type() != property.ty {
                    return PropertyQueryError::storage(format!(
                        "Value of type {} cannot be stored in property {}", v.scalar_type(), property
                    )).err();
                }
            }
            slots.insert(property.id, value);
        }
        self.fill_non_nullable(&mut slots);

        let id = self.id_manager.next()
            .ok_or_else(|| PropertyQueryError::storage("row id space exhausted"))?;
        let row = Row { id, values: slots };
        trace!(collection = %self.schema.name, row = %id, "put row");
        self.rows.insert(id, row);
        Ok(id)
    }

    /// Slots of non-nullable properties never read as null: missing or
    /// null values are stored as the type's zero.
    fn fill_non_nullable(&self, slots: &mut IndexMap<PropertyId, Option<ScalarValue>>) {
        for property in self.schema.properties.values().filter(|p| !p.nullable) {
            let slot = slots.entry(property.id).or_insert(None);
            if slot.is_none() {
                *slot = Some(ScalarValue::zero(property.ty));
            }
        }
    }

    /// Convert one JSON object into a row, drawing generated ids from `ids`.
    /// Nothing is stored; callers commit `ids` and the row once it is accepted.
    fn row_from_json(&self, item: &Value, ids: &mut IdManager) -> Result<Row, PropertyQueryError> {
        let Value::Object(map) = item else {
            return PropertyQueryError::storage(format!("expected a JSON object, got {item}")).err();
        };

        let id = match map.get(&self.config.id_key) {
            Some(Value::Number(n)) => {
                let id = RowId(n.as_u64().ok_or_else(|| PropertyQueryError::storage(format!("invalid row id {n}")))?);
                ids.observe(id).map_err(PropertyQueryError::storage)?;
                id
            }
            Some(Value::Null) | None => ids.next()
                .ok_or_else(|| PropertyQueryError::storage("row id space exhausted"))?,
            Some(other) => return PropertyQueryError::storage(format!("invalid row id {other}")).err(),
        };

        let mut row = Row::new(id);
        for (name, property) in &self.schema.properties {
            let Some(raw) = map.get(name) else { continue };
            let value = match ScalarValue::from_json(property.ty, raw) {
                Ok(value) => value,
                Err(reason) if !self.config.strict_types => {
                    warn!(collection = %self.schema.name, property = %name, %reason, "storing mistyped value as null");
                    None
                }
                Err(reason) => {
                    return PropertyQueryError::storage(format!("Property {property}: {reason}")).err();
                }
            };
            row.values.insert(property.id, value);
        }
        self.fill_non_nullable(&mut row.values);
        Ok(row)
    }

    /// Insert (or replace, when the id is already present) one JSON object.
    pub fn put_json(&mut self, item: &Value) -> Result<RowId, PropertyQueryError> {
        let mut ids = self.id_manager.clone();
        let row = self.row_from_json(item, &mut ids)?;
        let id = row.id;

        self.id_manager = ids;
        trace!(collection = %self.schema.name, row = %id, "put json row");
        self.rows.insert(id, row);
        Ok(id)
    }

    pub fn remove(&mut self, id: RowId) -> Option<Row> {
        self.rows.shift_remove(&id)
    }

    pub fn clear(&mut self) -> usize {
        let count = self.rows.len();
        self.rows.clear();
        self.id_manager.reset();
        count
    }

    pub fn load_from_json(&mut self, json_value: Value, keep: bool) -> Result<Vec<RowId>, PropertyQueryError> {
        // Guard: Check if it's a JSON Array
        let Value::Array(items) = json_value else {
            return PropertyQueryError::storage("JSON does not contain an array in the root").err();
        };

        // stage everything first: a bad item leaves rows and ids untouched
        let mut ids = if keep { self.id_manager.clone() } else { IdManager::new() };
        let staged = items.iter()
            .map(|item| self.row_from_json(item, &mut ids))
            .collect::<Result<Vec<_>, _>>()?;

        if !keep {
            self.rows.clear();
        }
        self.id_manager = ids;
        let loaded = staged.iter().map(|row| row.id).collect();
        for row in staged {
            self.rows.insert(row.id, row);
        }
        trace!(collection = %self.schema.name, rows = self.rows.len(), keep, "loaded json rows");
        Ok(loaded)
    }

    pub fn load_from_file(&mut self, file_path: &Path) -> Result<usize, PropertyQueryError> {
        let file_path_lossy = file_path.to_string_lossy();

        let file_content = fs::read_to_string(file_path)
            .map_err(|e| PropertyQueryError::storage(format!("Could not read file {file_path_lossy}: {e}")))?;

        let json_value = serde_json::from_str::<Value>(&file_content)
            .map_err(|e| PropertyQueryError::storage(format!("File {file_path_lossy} does not contain valid JSON: {e}")))?;

        let added = self.load_from_json(json_value, false)?;
        Ok(added.len())
    }

    pub fn to_json(&self) -> Vec<Value> {
        self.rows.values().map(|row| row.to_json(&self.schema, &self.config.id_key)).collect()
    }
}

/// Thread-safe, user-facing handle to a collection.
///
/// Cloning the handle shares the underlying rows. Every method acquires the
/// lock internally; a poisoned lock is reported as a storage error.
#[derive(Clone)]
pub struct Collection {
    pub(crate) inner: Arc<ProtectedCollection>,
}

impl Collection {
    /// Create a new collection for `schema`.
    pub fn new(schema: EntitySchema, config: StoreConfig) -> Self {
        Self { inner: Arc::new(InternalCollection::new(schema, config).into_protected()) }
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, InternalCollection>, PropertyQueryError> {
        self.inner.read().map_err(|_| PropertyQueryError::storage("collection lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, InternalCollection>, PropertyQueryError> {
        self.inner.write().map_err(|_| PropertyQueryError::storage("collection lock poisoned"))
    }

    /// Store a row given as `(property name, value)` pairs; `None` stores a null.
    pub fn put<I, K>(&self, values: I) -> Result<RowId, PropertyQueryError>
    where
        I: IntoIterator<Item = (K, Option<ScalarValue>)>,
        K: AsRef<str>,
    {
        self.write()?.put(values)
    }

    /// Store one JSON object; keys are property names plus the configured id key.
    pub fn put_json(&self, item: &Value) -> Result<RowId, PropertyQueryError> {
        self.write()?.put_json(item)
    }

    /// Load rows from a JSON array. Unless `keep` is set the collection is cleared first.
    pub fn load_from_json(&self, json_value: Value, keep: bool) -> Result<Vec<RowId>, PropertyQueryError> {
        self.write()?.load_from_json(json_value, keep)
    }

    /// Replace the content with the JSON array stored in `file_path`.
    pub fn load_from_file(&self, file_path: impl AsRef<Path>) -> Result<usize, PropertyQueryError> {
        self.write()?.load_from_file(file_path.as_ref())
    }

    /// Save all rows to `file_path` as a pretty-printed JSON array.
    pub fn write_to_file(&self, file_path: impl AsRef<Path>) -> Result<(), PropertyQueryError> {
        let data = self.read()?.to_json();
        let file = fs::File::create(file_path.as_ref())
            .map_err(|e| PropertyQueryError::storage(format!("Could not create file: {e}")))?;
        let mut w = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut w, &data)
            .map_err(|e| PropertyQueryError::storage(format!("Could not write file: {e}")))?;
        w.flush().map_err(|e| PropertyQueryError::storage(format!("Could not write file: {e}")))
    }

    pub fn get(&self, id: RowId) -> Result<Option<Row>, PropertyQueryError> {
        Ok(self.read()?.get(id).cloned())
    }

    pub fn count(&self) -> Result<usize, PropertyQueryError> {
        Ok(self.read()?.count())
    }

    pub fn remove(&self, id: RowId) -> Result<Option<Row>, PropertyQueryError> {
        Ok(self.write()?.remove(id))
    }

    pub fn clear(&self) -> Result<usize, PropertyQueryError> {
        Ok(self.write()?.clear())
    }

    pub fn schema(&self) -> Result<EntitySchema, PropertyQueryError> {
        Ok(self.read()?.schema.clone())
    }

    pub fn name(&self) -> Result<String, PropertyQueryError> {
        Ok(self.read()?.schema.name.clone())
    }

    /// Start building a query over this collection.
    pub fn query(&self) -> QueryBuilder {
        QueryBuilder::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::ScalarType;
    use serde_json::json;

    fn create_test_collection() -> Collection {
        let schema = EntitySchema::new("Fruit")
            .with("name", ScalarType::String)
            .with("weight", ScalarType::Int)
            .with("price", ScalarType::Double);
        Collection::new(schema, StoreConfig::default())
    }

    #[test]
    fn put_assigns_sequential_ids_and_keeps_order() {
        let c = create_test_collection();
        let a = c.put([("name", Some("apple".into())), ("weight", Some(ScalarValue::Int(120)))]).unwrap();
        let b = c.put([("name", None::<ScalarValue>)]).unwrap();
        assert_eq!(a, RowId(1));
        assert_eq!(b, RowId(2));
        assert_eq!(c.count().unwrap(), 2);

        let row = c.get(b).unwrap().unwrap();
        assert!(row.is_null(PropertyId(1)));
    }

    #[test]
    fn put_rejects_unknown_property_and_wrong_type() {
        let c = create_test_collection();
        let unknown = c.put([("color", Some("red".into()))]);
        assert!(matches!(unknown, Err(PropertyQueryError::Storage(_))));

        let mistyped = c.put([("weight", Some(ScalarValue::Long(1)))]);
        assert!(matches!(mistyped, Err(PropertyQueryError::Storage(_))));
        assert_eq!(c.count().unwrap(), 0);
    }

    #[test]
    fn load_from_json_uses_ids_from_rows() {
        let c = create_test_collection();
        let ids = c.load_from_json(json!([
            { "id": 5, "name": "pear", "weight": 180, "price": 0.5 },
            { "name": "plum", "weight": null }
        ]), false).unwrap();
        assert_eq!(ids, vec![RowId(5), RowId(6)]);

        let plum = c.get(RowId(6)).unwrap().unwrap();
        assert!(plum.is_null(PropertyId(2)));
        assert!(plum.is_null(PropertyId(3)));
    }

    #[test]
    fn failed_load_keeps_previous_rows() {
        let c = create_test_collection();
        c.load_from_json(json!([{ "weight": 1 }, { "weight": 2 }]), false).unwrap();

        let bad = json!([{ "weight": 10 }, { "weight": "bad" }, { "weight": 30 }]);
        let err = c.load_from_json(bad.clone(), false).unwrap_err();
        assert!(matches!(err, PropertyQueryError::Storage(_)));
        assert!(c.load_from_json(bad, true).is_err());

        assert_eq!(c.count().unwrap(), 2);
        let weights: Vec<_> = c.read().unwrap().rows().map(|row| row.get(PropertyId(2)).cloned()).collect();
        assert_eq!(weights, vec![Some(ScalarValue::Int(1)), Some(ScalarValue::Int(2))]);
        // ids handed out during the failed load are not consumed
        assert_eq!(c.put([("weight", Some(ScalarValue::Int(3)))]).unwrap(), RowId(3));
    }

    #[test]
    fn failed_file_load_keeps_previous_rows() {
        let c = create_test_collection();
        c.put([("name", Some("kiwi".into()))]).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, r#"[{ "name": "pear" }, { "name": 7 }]"#).unwrap();
        assert!(c.load_from_file(&path).is_err());
        assert_eq!(c.count().unwrap(), 1);
        assert_eq!(c.get(RowId(1)).unwrap().unwrap().get(PropertyId(1)), Some(&ScalarValue::from("kiwi")));
    }

    #[test]
    fn non_nullable_slots_hold_zero() {
        let mut schema = EntitySchema::new("Counter").with("label", ScalarType::String).with("n", ScalarType::Int);
        if let Some(n) = schema.properties.get_mut("n") {
            n.nullable = false;
        }
        let c = Collection::new(schema, StoreConfig::default());

        let a = c.put([("n", None::<ScalarValue>)]).unwrap();
        let b = c.put([("label", Some("only label".into()))]).unwrap();
        let d = c.put_json(&json!({ "n": null })).unwrap();
        for id in [a, b, d] {
            let row = c.get(id).unwrap().unwrap();
            assert_eq!(row.get(PropertyId(2)), Some(&ScalarValue::Int(0)));
        }
        // nullable properties still store null
        assert!(c.get(a).unwrap().unwrap().is_null(PropertyId(1)));
    }

    #[test]
    fn load_from_json_rejects_non_array() {
        let c = create_test_collection();
        assert!(c.load_from_json(json!({"name": "x"}), false).is_err());
    }

    #[test]
    fn strict_and_lenient_type_handling() {
        let c = create_test_collection();
        let err = c.put_json(&json!({"name": 12})).unwrap_err();
        assert!(err.to_string().contains("name (String)"));

        let schema = c.schema().unwrap();
        let lenient = Collection::new(schema, StoreConfig::lenient());
        let id = lenient.put_json(&json!({"name": 12, "weight": 3})).unwrap();
        let row = lenient.get(id).unwrap().unwrap();
        assert!(row.is_null(PropertyId(1)));
        assert_eq!(row.get(PropertyId(2)), Some(&ScalarValue::Int(3)));
    }

    #[test]
    fn put_json_with_existing_id_replaces_row() {
        let c = create_test_collection();
        c.put_json(&json!({"id": 1, "name": "a"})).unwrap();
        c.put_json(&json!({"id": 1, "name": "b"})).unwrap();
        assert_eq!(c.count().unwrap(), 1);
        let row = c.get(RowId(1)).unwrap().unwrap();
        assert_eq!(row.get(PropertyId(1)), Some(&ScalarValue::String("b".into())));
    }

    #[test]
    fn remove_and_clear() {
        let c = create_test_collection();
        let a = c.put([("name", Some("a".into()))]).unwrap();
        c.put([("name", Some("b".into()))]).unwrap();
        assert!(c.remove(a).unwrap().is_some());
        assert!(c.remove(a).unwrap().is_none());
        assert_eq!(c.clear().unwrap(), 1);
        assert_eq!(c.count().unwrap(), 0);
    }

    #[test]
    fn write_then_load_file() {
        let c = create_test_collection();
        c.put([("name", Some("kiwi".into())), ("price", Some(ScalarValue::Double(1.25)))]).unwrap();
        c.put([("name", None::<ScalarValue>)]).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fruit.json");
        c.write_to_file(&path).unwrap();

        let other = Collection::new(c.schema().unwrap(), StoreConfig::default());
        assert_eq!(other.load_from_file(&path).unwrap(), 2);
        assert_eq!(other.read().unwrap().to_json(), c.read().unwrap().to_json());
    }

    #[test]
    fn load_from_missing_file_is_storage_error() {
        let c = create_test_collection();
        let dir = tempfile::tempdir().unwrap();
        let err = c.load_from_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PropertyQueryError::Storage(_)));
    }
}
