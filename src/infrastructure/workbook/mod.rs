//! Workbook readers

mod json;

pub use json::{JsonWorkbookReader, WorkbookReadError};
