//! JSON Workbook Reader
//!
//! Reads an upload exported as JSON:
//!
//! ```json
//! {
//!   "sheets": [
//!     {
//!       "title": "types",
//!       "headers": ["code", "name", "parent_code"],
//!       "rows": [{"code": "state", "name": "State", "parent_code": ""}]
//!     }
//!   ]
//! }
//! ```
//!
//! Spreadsheet exports carry numbers and booleans in cells, so scalar cells
//! are turned into text: numbers verbatim, `true`/`false` as `yes`/`no`,
//! `null` as a blank cell.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::application::workbook::{Sheet, Workbook};
use crate::domain::value_objects::Row;

#[derive(Debug, thiserror::Error)]
pub enum WorkbookReadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid workbook JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sheet '{sheet}', row {index}: column '{header}' must be text, a number or a boolean")]
    InvalidCell {
        sheet: String,
        index: usize,
        header: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawWorkbook {
    #[serde(default)]
    sheets: Vec<RawSheet>,
}

#[derive(Debug, Deserialize)]
struct RawSheet {
    title: String,
    #[serde(default)]
    headers: Vec<String>,
    #[serde(default)]
    rows: Vec<serde_json::Map<String, Value>>,
}

pub struct JsonWorkbookReader;

impl JsonWorkbookReader {
    pub fn read_path(path: &Path) -> Result<Workbook, WorkbookReadError> {
        let content = fs::read_to_string(path).map_err(|source| WorkbookReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::read_str(&content)
    }

    pub fn read_str(content: &str) -> Result<Workbook, WorkbookReadError> {
        let raw: RawWorkbook = serde_json::from_str(content)?;
        let mut workbook = Workbook::new();
        for raw_sheet in raw.sheets {
            let mut sheet = Sheet::new(raw_sheet.title, raw_sheet.headers);
            for (index, cells) in raw_sheet.rows.into_iter().enumerate() {
                let mut row = Row::new();
                for (header, value) in cells {
                    let Some(text) = cell_text(&value) else {
                        return Err(WorkbookReadError::InvalidCell {
                            sheet: sheet.title.clone(),
                            index,
                            header,
                        });
                    };
                    row.insert(header, text);
                }
                sheet.rows.push(row);
            }
            workbook.sheets.push(sheet);
        }
        tracing::debug!(sheets = workbook.sheets.len(), "read workbook");
        Ok(workbook)
    }
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("yes".to_string()),
        Value::Bool(false) => Some("no".to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}
