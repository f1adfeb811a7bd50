//! Case-insensitive substring search over universe records.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::UniverseRecord;
use crate::{DomainError, DomainResult};

/// A searchable record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    /// Permanent identifier.
    Identifier,
    /// Primary exchange code.
    ExchangeCode,
    /// Common display name.
    DisplayName,
}

/// Which field(s) a query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    /// Identifier only.
    Identifier,
    /// Exchange code only.
    ExchangeCode,
    /// Display name only.
    DisplayName,
    /// Exchange code, then display name, then identifier, deduplicated.
    #[default]
    Any,
}

impl SearchKind {
    /// Fields searched, in evaluation order.
    #[must_use]
    pub const fn fields(self) -> &'static [SearchField] {
        match self {
            Self::Identifier => &[SearchField::Identifier],
            Self::ExchangeCode => &[SearchField::ExchangeCode],
            Self::DisplayName => &[SearchField::DisplayName],
            Self::Any => &[
                SearchField::ExchangeCode,
                SearchField::DisplayName,
                SearchField::Identifier,
            ],
        }
    }

    /// Canonical name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::ExchangeCode => "exchange_code",
            Self::DisplayName => "display_name",
            Self::Any => "any",
        }
    }

    /// Parses an optional kind, treating absent or blank input as [`SearchKind::Any`].
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSearchKind`] for unrecognized names.
    pub fn parse_or_any(value: Option<&str>) -> DomainResult<Self> {
        value.map_or(Ok(Self::Any), str::parse)
    }
}

impl FromStr for SearchKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "" | "any" => Ok(Self::Any),
            "permid" | "identifier" | "id" => Ok(Self::Identifier),
            "ric" | "primaryric" | "exchangecode" => Ok(Self::ExchangeCode),
            "name" | "commonname" | "displayname" => Ok(Self::DisplayName),
            _ => Err(DomainError::InvalidSearchKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for SearchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the records whose `kind` field(s) contain `query`, ignoring case.
///
/// Records with an absent or empty target field never match. Results keep
/// the order of first match; for [`SearchKind::Any`] exact duplicates are
/// dropped.
#[must_use]
pub fn search(query: &str, kind: SearchKind, records: &[UniverseRecord]) -> Vec<UniverseRecord> {
    if query.is_empty() || records.is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    let dedupe = kind.fields().len() > 1;
    let mut seen: HashSet<&UniverseRecord> = HashSet::new();
    let mut results = Vec::new();

    for &field in kind.fields() {
        for record in records.iter().filter(|r| field_matches(r, field, &needle)) {
            if !dedupe || seen.insert(record) {
                results.push(record.clone());
            }
        }
    }

    results
}

fn field_matches(record: &UniverseRecord, field: SearchField, needle: &str) -> bool {
    record
        .field(field)
        .is_some_and(|value| !value.is_empty() && value.to_lowercase().contains(needle))
}
