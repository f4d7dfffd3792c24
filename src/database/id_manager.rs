use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Handle of a stored row. Ids are positive; 0 is never assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub u64);

impl Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequential row id generator.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IdManager {
    pub current: Option<RowId>,
}

impl IdManager {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Record an externally supplied id so later generated ids do not collide with it.
    pub fn observe(&mut self, id: RowId) -> Result<(), String> {
        if id.0 == 0 {
            return Err("Row id 0 is reserved".to_string());
        }
        if self.current.is_none_or(|current| id > current) {
            self.current = Some(id);
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}

impl Iterator for IdManager {
    type Item = RowId;
    fn next(&mut self) -> Option<Self::Item> {
        let item = match self.current {
            Some(RowId(u64::MAX)) => return None,
            Some(RowId(id)) => RowId(id + 1),
            None => RowId(1),
        };

        self.current = Some(item);
        Some(item)
    }
}
