use std::sync::RwLockReadGuard;

use tracing::debug;

use crate::{
    database::{Collection, InternalCollection, Property, Row, RowId, ScalarValue},
    error::PropertyQueryError,
    property::PropertyQuery,
    query::{CompareOp, Condition, RowSnapshot, RowSource},
};

/// Collects conditions for a [`Query`]. All conditions must hold for a row to match.
pub struct QueryBuilder {
    collection: Collection,
    conditions: Vec<Condition>,
    error: Option<PropertyQueryError>,
}

impl QueryBuilder {
    pub fn new(collection: Collection) -> Self {
        Self { collection, conditions: Vec::new(), error: None }
    }

    fn push(mut self, property: &Property, op: CompareOp, value: ScalarValue) -> Self {
        if self.error.is_none() {
            match Condition::new(property.clone(), op, value) {
                Ok(condition) => self.conditions.push(condition),
                Err(e) => self.error = Some(e),
            }
        }
        self
    }

    pub fn equal(self, property: &Property, value: impl Into<ScalarValue>) -> Self {
        self.push(property, CompareOp::Equal, value.into())
    }

    pub fn not_equal(self, property: &Property, value: impl Into<ScalarValue>) -> Self {
        self.push(property, CompareOp::NotEqual, value.into())
    }

    pub fn greater(self, property: &Property, value: impl Into<ScalarValue>) -> Self {
        self.push(property, CompareOp::Greater, value.into())
    }

    pub fn less(self, property: &Property, value: impl Into<ScalarValue>) -> Self {
        self.push(property, CompareOp::Less, value.into())
    }

    pub fn starts_with(self, property: &Property, prefix: &str, case_sensitive: bool) -> Self {
        self.push(property, CompareOp::StartsWith { case_sensitive }, prefix.into())
    }

    pub fn like(self, property: &Property, pattern: &str) -> Self {
        self.push(property, CompareOp::Like, pattern.into())
    }

    /// Finish the query. Fails with the first invalid condition, or when a
    /// condition names a property the entity does not declare.
    pub fn build(self) -> Result<Query, PropertyQueryError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        {
            let guard = self.collection.read()?;
            if let Some(c) = self.conditions.iter().find(|c| !guard.schema.contains(&c.property)) {
                return PropertyQueryError::configuration(format!(
                    "Property {} does not belong to entity {}", c.property, guard.schema.name
                )).err();
            }
        }
        Ok(Query { collection: self.collection, conditions: self.conditions })
    }
}

/// A filter over one collection with rebindable parameters.
#[derive(Clone)]
pub struct Query {
    collection: Collection,
    conditions: Vec<Condition>,
}

impl Query {
    /// Rebind the parameter of every condition on `property`.
    pub fn set_parameter(&mut self, property: &Property, value: impl Into<ScalarValue>) -> Result<&mut Self, PropertyQueryError> {
        let value = value.into();
        let mut bound = false;
        for condition in self.conditions.iter_mut().filter(|c| c.property.same_as(property)) {
            condition.bind(value.clone())?;
            bound = true;
        }
        if !bound {
            return PropertyQueryError::configuration(format!("Query has no condition on property {property}")).err();
        }
        Ok(self)
    }

    /// Number of matching rows.
    pub fn count(&self) -> Result<u64, PropertyQueryError> {
        Ok(self.snapshot()?.rows.len() as u64)
    }

    /// Ids of the matching rows in match order.
    pub fn find_ids(&self) -> Result<Vec<RowId>, PropertyQueryError> {
        Ok(self.snapshot()?.rows)
    }

    /// Post-process the values of one property of the matching rows.
    ///
    /// The property query works on its own copy of this query; rebind
    /// parameters through [`PropertyQuery::source_mut`].
    pub fn property(&self, property: &Property) -> Result<PropertyQuery<Query>, PropertyQueryError> {
        PropertyQuery::new(self.clone(), property)
    }

    fn matches(&self, row: &Row) -> bool {
        self.conditions.iter().all(|c| c.matches(row.get(c.property.id)))
    }
}

/// Read-locked view of a collection plus the rows a query matched in it.
pub struct QuerySnapshot<'a> {
    guard: RwLockReadGuard<'a, InternalCollection>,
    rows: Vec<RowId>,
}

impl RowSource for Query {
    type Snapshot<'a> = QuerySnapshot<'a>;

    fn snapshot(&self) -> Result<QuerySnapshot<'_>, PropertyQueryError> {
        let guard = self.collection.read()?;
        let rows: Vec<RowId> = guard.rows().filter(|row| self.matches(row)).map(|row| row.id).collect();
        debug!(collection = %guard.schema.name, matched = rows.len(), "query snapshot");
        Ok(QuerySnapshot { guard, rows })
    }

    fn supports(&self, property: &Property) -> bool {
        self.collection.read().is_ok_and(|guard| guard.schema.contains(property))
    }
}

impl RowSnapshot for QuerySnapshot<'_> {
    fn matched_rows(&self) -> &[RowId] {
        &self.rows
    }

    fn raw_value(&self, row: RowId, property: &Property) -> Result<Option<ScalarValue>, PropertyQueryError> {
        let stored = self.guard.get(row)
            .ok_or_else(|| PropertyQueryError::storage(format!("Row {row} vanished from snapshot")))?;
        Ok(stored.get(property.id).cloned())
    }
}
