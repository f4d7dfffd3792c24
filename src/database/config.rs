use serde::{Deserialize, Serialize};

/// Store configuration used when creating collections.
///
/// - `id_key` is the JSON key holding the row id when rows are loaded from JSON.
/// - `strict_types` rejects JSON values whose shape does not match the
///   declared property type; when off such values are stored as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Field name inside JSON rows that contains the row id
    pub id_key: String,
    /// Reject mistyped JSON values instead of nulling them
    pub strict_types: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { id_key: "id".to_string(), strict_types: true }
    }
}

impl StoreConfig {
    /// Create default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration with explicit `id_key` and type strictness.
    pub fn from(id_key: &str, strict_types: bool) -> Self {
        Self {
            id_key: id_key.to_string(),
            strict_types,
        }
    }

    /// Convenience: default id key, mistyped JSON values become null.
    pub fn lenient() -> Self {
        Self { strict_types: false, ..Self::default() }
    }
}
