//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `NewLocationImporter` - validate an upload and commit it in one transaction
//! - `parse_workbook` - check workbook format and build row stubs

pub mod import;
pub mod workbook;

pub use import::{
    CommitError, ImportError, ImportOptions, ImportResult, ImportSummary, NewLocationImporter,
};
pub use workbook::{
    parse_workbook, ParsedWorkbook, Sheet, SheetFormatError, Workbook, WorkbookError,
    TYPES_SHEET_TITLE,
};
