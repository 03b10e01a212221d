//! Row value object - one already-parsed input row
//!
//! A row is a header -> cell mapping. Cells are kept verbatim; accessors
//! trim and treat blank cells as absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Prefix of custom-data column headers (`data: population`)
pub const CUSTOM_DATA_PREFIX: &str = "data: ";

/// Prefix of uncategorized-data column headers (`uncategorized_data: legacy_code`)
pub const UNCATEGORIZED_DATA_PREFIX: &str = "uncategorized_data: ";

/// One row of a sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: BTreeMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style cell insertion (mostly for tests and readers)
    pub fn with(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.cells.insert(header.into(), value.into());
        self
    }

    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(header.into(), value.into());
    }

    /// Trimmed, non-blank cell value
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .get(header)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Trimmed, non-blank cell value as an owned string
    pub fn get_string(&self, header: &str) -> Option<String> {
        self.get(header).map(str::to_string)
    }

    /// Read a yes/no column; absent cells are `false`
    pub fn flag(&self, header: &str) -> bool {
        self.get(header).map(parse_flag).unwrap_or(false)
    }

    /// Whether the column exists at all (even if blank)
    pub fn has_column(&self, header: &str) -> bool {
        self.cells.contains_key(header)
    }

    /// Cells whose header starts with `prefix`, keyed by the rest of the header.
    ///
    /// Blank keys (a bare `data: ` header) are skipped. Blank values are kept as
    /// empty strings: clearing a field is a meaningful edit.
    pub fn prefixed(&self, prefix: &str) -> BTreeMap<String, String> {
        self.cells
            .iter()
            .filter_map(|(header, value)| {
                let key = header.strip_prefix(prefix)?.trim();
                if key.is_empty() {
                    None
                } else {
                    Some((key.to_string(), value.trim().to_string()))
                }
            })
            .collect()
    }

    /// Whether any header starts with `prefix`
    pub fn has_prefixed(&self, prefix: &str) -> bool {
        self.cells.keys().any(|h| h.starts_with(prefix))
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(|s| s.as_str())
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Case-insensitive `y`/`yes` is true; anything else is false
pub fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "y" | "yes")
}
