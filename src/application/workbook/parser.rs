//! Workbook parsing
//!
//! Checks the shape of the workbook (sheets present, headers exact) and
//! turns every row into a stub. Any problem here aborts before validation.

use std::collections::{BTreeSet, HashSet};

use crate::domain::entities::{
    LocationSheetHeaders, LocationStub, LocationTypeStub, RowFormatError, TypeSheetHeaders,
};

use super::sheet::{Sheet, Workbook, TYPES_SHEET_TITLE};

/// The workbook itself is malformed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SheetFormatError {
    #[error("'types' sheet is required")]
    MissingTypesSheet,

    #[error(
        "'types' sheet should contain exactly '{expected}' as the sheet headers. '{missing}' are missing{}",
        not_recognized(.unrecognized)
    )]
    BadTypeHeaders {
        expected: String,
        missing: String,
        unrecognized: String,
    },

    #[error(
        "Locations sheet with title '{sheet}' should contain exactly '{expected}' as the sheet headers. '{missing}' are missing{}",
        not_recognized(.unrecognized)
    )]
    BadLocationHeaders {
        sheet: String,
        expected: String,
        missing: String,
        unrecognized: String,
    },

    #[error("Location type '{code}' has no locations sheet")]
    MissingLocationSheet { code: String },

    #[error("Sheet '{title}' appears more than once")]
    DuplicateSheet { title: String },
}

fn not_recognized(unrecognized: &str) -> String {
    if unrecognized.is_empty() {
        String::new()
    } else {
        format!(" '{}' are not recognized", unrecognized)
    }
}

/// Either the workbook or one of its rows could not be read
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkbookError {
    #[error(transparent)]
    Sheet(#[from] SheetFormatError),

    #[error(transparent)]
    Row(#[from] RowFormatError),
}

/// Stubs read from a workbook, in sheet and row order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedWorkbook {
    pub types: Vec<LocationTypeStub>,
    pub locations: Vec<LocationStub>,
}

/// Check the workbook's shape and build stubs from its rows
pub fn parse_workbook(workbook: &Workbook) -> Result<ParsedWorkbook, WorkbookError> {
    let mut titles = HashSet::new();
    for sheet in &workbook.sheets {
        if !titles.insert(sheet.title.as_str()) {
            return Err(SheetFormatError::DuplicateSheet {
                title: sheet.title.clone(),
            }
            .into());
        }
    }

    let types_sheet = workbook
        .sheet(TYPES_SHEET_TITLE)
        .ok_or(SheetFormatError::MissingTypesSheet)?;
    check_type_headers(types_sheet)?;
    for sheet in workbook.location_sheets() {
        check_location_headers(sheet)?;
    }

    let types: Vec<LocationTypeStub> = types_sheet
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| LocationTypeStub::from_row(row, index))
        .collect();

    for t in types.iter().filter(|t| !t.do_delete) {
        if workbook.sheet(&t.code).is_none() {
            return Err(SheetFormatError::MissingLocationSheet {
                code: t.code.clone(),
            }
            .into());
        }
    }

    let mut locations = Vec::new();
    for sheet in workbook.location_sheets() {
        for (index, row) in sheet.rows.iter().enumerate() {
            locations.push(LocationStub::from_row(row, index, &sheet.title)?);
        }
    }

    tracing::debug!(
        types = types.len(),
        locations = locations.len(),
        "parsed workbook"
    );
    Ok(ParsedWorkbook { types, locations })
}

fn check_type_headers(sheet: &Sheet) -> Result<(), SheetFormatError> {
    let actual: BTreeSet<String> = sheet.effective_headers().into_iter().collect();
    let required: BTreeSet<String> = TypeSheetHeaders::REQUIRED.iter().map(|h| h.to_string()).collect();
    let allowed: BTreeSet<String> = required
        .iter()
        .cloned()
        .chain(TypeSheetHeaders::OPTIONAL.iter().map(|h| h.to_string()))
        .collect();

    let missing = joined(required.difference(&actual));
    let unrecognized = joined(actual.difference(&allowed));
    if missing.is_empty() && unrecognized.is_empty() {
        return Ok(());
    }
    Err(SheetFormatError::BadTypeHeaders {
        expected: TypeSheetHeaders::REQUIRED.join(", "),
        missing,
        unrecognized,
    })
}

fn check_location_headers(sheet: &Sheet) -> Result<(), SheetFormatError> {
    let actual: BTreeSet<String> = sheet
        .effective_headers()
        .into_iter()
        .filter(|h| !LocationSheetHeaders::is_optional(h))
        .collect();
    let required: BTreeSet<String> = LocationSheetHeaders::REQUIRED
        .iter()
        .map(|h| h.to_string())
        .collect();

    let missing = joined(required.difference(&actual));
    let unrecognized = joined(actual.difference(&required));
    if missing.is_empty() && unrecognized.is_empty() {
        return Ok(());
    }
    Err(SheetFormatError::BadLocationHeaders {
        sheet: sheet.title.clone(),
        expected: LocationSheetHeaders::REQUIRED.join(", "),
        missing,
        unrecognized,
    })
}

fn joined<'a>(headers: impl Iterator<Item = &'a String>) -> String {
    headers.map(String::as_str).collect::<Vec<_>>().join(", ")
}
