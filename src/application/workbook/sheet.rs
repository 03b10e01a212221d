//! Workbook container - named sheets of already-parsed rows

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Row;

/// Title of the sheet listing location types
pub const TYPES_SHEET_TITLE: &str = "types";

/// A collection of named sheets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

/// One named sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub title: String,
    /// Column headers; derived from the rows when left empty
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.sheets.push(sheet);
        self
    }

    pub fn sheet(&self, title: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.title == title)
    }

    /// Every sheet except the types sheet
    pub fn location_sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter().filter(|s| s.title != TYPES_SHEET_TITLE)
    }
}

impl Sheet {
    pub fn new<I, S>(title: impl Into<String>, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    /// Declared headers, or the union of row columns when none were declared
    pub fn effective_headers(&self) -> Vec<String> {
        if !self.headers.is_empty() {
            return self.headers.clone();
        }
        let mut headers: Vec<String> = Vec::new();
        for row in &self.rows {
            for header in row.headers() {
                if !headers.iter().any(|h| h == header) {
                    headers.push(header.to_string());
                }
            }
        }
        headers
    }
}
