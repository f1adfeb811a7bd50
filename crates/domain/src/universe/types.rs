//! Universe snapshot and platform validation error types

use serde::{Deserialize, Serialize};

use super::SearchField;
use crate::lenient;

/// Column descriptor declared by the platform alongside the data matrix.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeaderMeta {
    /// Machine name of the column.
    #[serde(default)]
    pub name: Option<String>,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Declared value type.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

impl HeaderMeta {
    /// Creates a header with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// One row of the universe: identifier, exchange code and display name.
///
/// Serialized with the platform's field names so cached snapshots stay
/// readable by other consumers of the same store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct UniverseRecord {
    /// Permanent identifier.
    #[serde(default, rename = "PermId")]
    pub identifier: Option<String>,
    /// Primary exchange code (RIC).
    #[serde(default, rename = "PrimaryRic")]
    pub exchange_code: Option<String>,
    /// Common display name.
    #[serde(default, rename = "CommonName")]
    pub display_name: Option<String>,
}

impl UniverseRecord {
    /// Creates a record with all three fields set.
    #[must_use]
    pub fn new(
        identifier: impl Into<String>,
        exchange_code: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            identifier: Some(identifier.into()),
            exchange_code: Some(exchange_code.into()),
            display_name: Some(display_name.into()),
        }
    }

    /// Returns the value of the given field.
    #[must_use]
    pub fn field(&self, field: SearchField) -> Option<&str> {
        match field {
            SearchField::Identifier => self.identifier.as_deref(),
            SearchField::ExchangeCode => self.exchange_code.as_deref(),
            SearchField::DisplayName => self.display_name.as_deref(),
        }
    }
}

/// A normalized, point-in-time capture of the universe.
///
/// `count` is whatever the platform reported and is not guaranteed to equal
/// `records.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UniverseSnapshot {
    /// Record count reported by the platform.
    #[serde(default, rename = "EsgUniverseCount")]
    pub count: Option<u64>,
    /// Column metadata, in platform order.
    #[serde(default, rename = "EsgUniverseHeader", deserialize_with = "lenient::vec_or_null")]
    pub headers: Vec<HeaderMeta>,
    /// Records, in platform order.
    #[serde(default, rename = "EsgUniverse", deserialize_with = "lenient::vec_or_null")]
    pub records: Vec<UniverseRecord>,
}

impl UniverseSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub const fn new(
        count: Option<u64>,
        headers: Vec<HeaderMeta>,
        records: Vec<UniverseRecord>,
    ) -> Self {
        Self {
            count,
            headers,
            records,
        }
    }

    /// A copy carrying only the reported count.
    #[must_use]
    pub const fn count_only(&self) -> Self {
        Self::new(self.count, Vec::new(), Vec::new())
    }
}

/// The offending field of a platform validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidField {
    /// Name of the invalid parameter.
    #[serde(default)]
    pub invalid_name: Option<String>,
    /// Values rejected for that parameter.
    #[serde(default, deserialize_with = "lenient::vec_or_null")]
    pub invalid_values: Vec<String>,
    /// Error key.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub key: Option<String>,
    /// Error name.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    /// Error value.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub value: Option<String>,
}

/// Request validation failure returned by the universe endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataError {
    /// Platform error code.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub code: Option<String>,
    /// Structured detail about the invalid field.
    #[serde(default)]
    pub errors: Option<InvalidField>,
    /// Platform error id.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Platform status string.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub status: Option<String>,
    /// HTTP status of the failing response.
    #[serde(default)]
    pub http_status: u16,
    /// HTTP reason phrase of the failing response.
    #[serde(default)]
    pub reason: Option<String>,
}

impl DataError {
    /// Creates an error carrying only HTTP status information.
    #[must_use]
    pub fn from_status(http_status: u16, reason: Option<String>) -> Self {
        Self {
            http_status,
            reason,
            ..Self::default()
        }
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "universe endpoint returned {}", self.http_status)?;
        if let Some(reason) = &self.reason {
            write!(f, " {reason}")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(name) = self.errors.as_ref().and_then(|e| e.invalid_name.as_deref()) {
            write!(f, " (invalid {name})")?;
        }
        Ok(())
    }
}

impl std::error::Error for DataError {}
