use std::{collections::HashMap, sync::{Arc, RwLock}};

use crate::{database::{Collection, EntitySchema, StoreConfig}, error::PropertyQueryError};

pub type Db = Arc<RwLock<InternalDb>>;

/// Registry of collections keyed by entity name.
#[derive(Default)]
pub struct InternalDb {
    config: StoreConfig,
    collections: HashMap<String, Collection>,
}

impl InternalDb {
    pub fn into_protected(self) -> Db {
        Arc::new(RwLock::new(self))
    }

    fn new_db_with_config(config: StoreConfig) -> Self {
        Self {
            config,
            collections: HashMap::new(),
        }
    }

    /// Create (or replace) the collection for `schema` using the db-wide config.
    pub fn create(&mut self, schema: EntitySchema) -> Collection {
        self.create_with_config(schema, self.config.clone())
    }

    pub fn create_with_config(&mut self, schema: EntitySchema, config: StoreConfig) -> Collection {
        let name = schema.name.clone();
        let collection = Collection::new(schema, config);
        self.collections.insert(name, collection.clone());

        collection
    }

    pub fn get(&self, name: &str) -> Option<Collection> {
        self.collections.get(name).cloned()
    }

    pub fn list_collections(&self) -> Vec<String> {
        let mut names = self.collections.keys().cloned().collect::<Vec<_>>();
        names.sort();
        names
    }
}

pub trait DbCommon {
    fn new_db() -> Self;
    fn new_db_with_config(config: StoreConfig) -> Self;
    fn create(&self, schema: EntitySchema) -> Result<Collection, PropertyQueryError>;
    fn create_with_config(&self, schema: EntitySchema, config: StoreConfig) -> Result<Collection, PropertyQueryError>;
    fn get(&self, name: &str) -> Result<Option<Collection>, PropertyQueryError>;
    fn list_collections(&self) -> Result<Vec<String>, PropertyQueryError>;
}

fn poisoned<T>(_: T) -> PropertyQueryError {
    PropertyQueryError::storage("db lock poisoned")
}

impl DbCommon for Db {
    fn new_db() -> Self {
        InternalDb::default().into_protected()
    }

    fn new_db_with_config(config: StoreConfig) -> Self {
        InternalDb::new_db_with_config(config).into_protected()
    }

    fn create(&self, schema: EntitySchema) -> Result<Collection, PropertyQueryError> {
        Ok(self.write().map_err(poisoned)?.create(schema))
    }

    fn create_with_config(&self, schema: EntitySchema, config: StoreConfig) -> Result<Collection, PropertyQueryError> {
        Ok(self.write().map_err(poisoned)?.create_with_config(schema, config))
    }

    fn get(&self, name: &str) -> Result<Option<Collection>, PropertyQueryError> {
        Ok(self.read().map_err(poisoned)?.get(name))
    }

    fn list_collections(&self) -> Result<Vec<String>, PropertyQueryError> {
        Ok(self.read().map_err(poisoned)?.list_collections())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::ScalarType;

    #[test]
    fn create_and_lookup_share_rows() {
        let db = Db::new_db();
        let created = db.create(EntitySchema::new("Note").with("text", ScalarType::String)).unwrap();
        created.put([("text", Some("hi".into()))]).unwrap();

        let found = db.get("Note").unwrap().unwrap();
        assert_eq!(found.count().unwrap(), 1);
        assert!(db.get("Other").unwrap().is_none());
    }

    #[test]
    fn db_config_is_inherited() {
        let db = Db::new_db_with_config(StoreConfig::lenient());
        let c = db.create(EntitySchema::new("B").with("n", ScalarType::Int)).unwrap();
        let id = c.put_json(&serde_json::json!({"n": "not a number"})).unwrap();
        assert!(c.get(id).unwrap().unwrap().values.values().all(Option::is_none));

        db.create(EntitySchema::new("A")).unwrap();
        assert_eq!(db.list_collections().unwrap(), vec!["A", "B"]);
    }
}
