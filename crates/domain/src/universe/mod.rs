//! Universe dataset types, row normalization and search

mod mapping;
mod search;
mod types;

pub use mapping::{ColumnMapping, normalize_rows};
pub use search::{SearchField, SearchKind, search};
pub use types::{DataError, HeaderMeta, InvalidField, UniverseRecord, UniverseSnapshot};
