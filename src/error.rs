use std::fmt::Display;

/// Errors raised by property queries and by the in-memory store backing them.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyQueryError {
    /// Property/operation type mismatch or an invalid configuration call.
    /// Always raised before any row is scanned.
    Configuration(String),
    /// The running sum left the representable range.
    NumericOverflow { negative: bool },
    /// `unique()` was requested but more than one value remained.
    DataConsistency(String),
    /// The storage collaborator failed or broke its contract.
    Storage(String),
}

impl PropertyQueryError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn overflow(negative: bool) -> Self {
        Self::NumericOverflow { negative }
    }

    pub fn err<T>(self) -> Result<T, PropertyQueryError> {
        Err(self)
    }
}

impl Display for PropertyQueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyQueryError::Configuration(message) => write!(f, "ConfigurationError: {message}"),
            PropertyQueryError::NumericOverflow { negative: false } => f.write_str("Numeric overflow"),
            PropertyQueryError::NumericOverflow { negative: true } => f.write_str("Numeric overflow (negative)"),
            PropertyQueryError::DataConsistency(message) => write!(f, "DataConsistencyError: {message}"),
            PropertyQueryError::Storage(message) => write!(f, "StorageError: {message}"),
        }
    }
}

impl std::error::Error for PropertyQueryError {}
