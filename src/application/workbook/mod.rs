//! Workbook input
//!
//! The tabular upload: a "types" sheet plus one locations sheet per type.

mod parser;
mod sheet;

pub use parser::{parse_workbook, ParsedWorkbook, SheetFormatError, WorkbookError};
pub use sheet::{Sheet, Workbook, TYPES_SHEET_TITLE};
