//! Row-to-record normalization for the platform's tabular payload.
//!
//! The platform returns the universe as a row-major matrix of string cells
//! plus a list of column headers. Columns are located by header name when
//! the headers name all three target fields; otherwise the historical
//! positional layout (identifier, exchange code, display name) is assumed.

use super::{HeaderMeta, UniverseRecord};

const IDENTIFIER_NAMES: &[&str] = &["permid", "organizationid", "identifier"];
const EXCHANGE_CODE_NAMES: &[&str] = &["primaryric", "ric", "exchangecode"];
const DISPLAY_NAME_NAMES: &[&str] = &["commonname", "name", "displayname"];

/// Column positions of the three record fields within a data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    identifier: usize,
    exchange_code: usize,
    display_name: usize,
}

impl ColumnMapping {
    /// Identifier in column 0, exchange code in 1, display name in 2.
    pub const POSITIONAL: Self = Self {
        identifier: 0,
        exchange_code: 1,
        display_name: 2,
    };

    /// Derives the mapping from declared headers.
    ///
    /// Falls back to [`ColumnMapping::POSITIONAL`] unless all three fields
    /// resolve to distinct columns.
    #[must_use]
    pub fn from_headers(headers: &[HeaderMeta]) -> Self {
        let find = |aliases: &[&str]| {
            headers.iter().position(|header| {
                header
                    .name
                    .as_deref()
                    .is_some_and(|name| aliases.contains(&normalize(name).as_str()))
            })
        };

        match (
            find(IDENTIFIER_NAMES),
            find(EXCHANGE_CODE_NAMES),
            find(DISPLAY_NAME_NAMES),
        ) {
            (Some(identifier), Some(exchange_code), Some(display_name))
                if identifier != exchange_code
                    && identifier != display_name
                    && exchange_code != display_name =>
            {
                Self {
                    identifier,
                    exchange_code,
                    display_name,
                }
            }
            _ => Self::POSITIONAL,
        }
    }

    /// Returns true if this is the positional fallback layout.
    #[must_use]
    pub fn is_positional(&self) -> bool {
        *self == Self::POSITIONAL
    }

    /// Builds a record from one data row. Missing cells leave fields unset.
    #[must_use]
    pub fn record(&self, row: &[Option<String>]) -> UniverseRecord {
        let cell = |index: usize| row.get(index).cloned().flatten();
        UniverseRecord {
            identifier: cell(self.identifier),
            exchange_code: cell(self.exchange_code),
            display_name: cell(self.display_name),
        }
    }
}

/// Normalizes a data matrix into records, preserving row order.
#[must_use]
pub fn normalize_rows(headers: &[HeaderMeta], rows: &[Vec<Option<String>>]) -> Vec<UniverseRecord> {
    let mapping = ColumnMapping::from_headers(headers);
    rows.iter().map(|row| mapping.record(row)).collect()
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Vec<Option<String>> {
        cells.iter().map(|c| Some((*c).to_string())).collect()
    }

    #[test]
    fn test_positional_mapping_without_headers() {
        let records = normalize_rows(&[], &[row(&["4295856598", "MSFT.O", "Microsoft Corp", "extra"])]);
        assert_eq!(
            records,
            vec![UniverseRecord::new("4295856598", "MSFT.O", "Microsoft Corp")]
        );
    }

    #[test]
    fn test_short_row_leaves_fields_unset() {
        let records = normalize_rows(&[], &[row(&["4295856598"]), vec![]]);
        assert_eq!(
            records,
            vec![
                UniverseRecord {
                    identifier: Some("4295856598".to_string()),
                    ..UniverseRecord::default()
                },
                UniverseRecord::default(),
            ]
        );
    }

    #[test]
    fn test_null_cell_is_unset() {
        let records = normalize_rows(&[], &[vec![Some("1".to_string()), None, Some("Acme".to_string())]]);
        assert_eq!(records[0].exchange_code, None);
        assert_eq!(records[0].display_name.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_header_driven_mapping_reorders_columns() {
        let headers = vec![
            HeaderMeta::named("CommonName"),
            HeaderMeta::named("Sector"),
            HeaderMeta::named("PrimaryRIC"),
            HeaderMeta::named("PermID"),
        ];
        let mapping = ColumnMapping::from_headers(&headers);
        assert!(!mapping.is_positional());

        let records = normalize_rows(&headers, &[row(&["Apple Inc", "Tech", "AAPL.O", "5035948617"])]);
        assert_eq!(
            records,
            vec![UniverseRecord::new("5035948617", "AAPL.O", "Apple Inc")]
        );
    }

    #[test]
    fn test_incomplete_headers_fall_back_to_positional() {
        let headers = vec![HeaderMeta::named("PermId"), HeaderMeta::named("Unknown")];
        assert!(ColumnMapping::from_headers(&headers).is_positional());

        let unnamed = vec![HeaderMeta::default(); 3];
        assert!(ColumnMapping::from_headers(&unnamed).is_positional());
    }
}
