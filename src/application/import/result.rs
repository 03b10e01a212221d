//! Import result types

use crate::domain::entities::RowFormatError;
use crate::domain::ports::StoreError;
use crate::domain::value_objects::RecordAction;

/// Counts of what a run did (or, in a dry run, would do)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub types_created: usize,
    pub types_updated: usize,
    pub types_deleted: usize,
    pub types_unchanged: usize,
    pub locations_created: usize,
    pub locations_updated: usize,
    pub locations_deleted: usize,
    pub locations_unchanged: usize,
}

impl ImportSummary {
    pub fn record_type(&mut self, action: RecordAction) {
        match action {
            RecordAction::Create => self.types_created += 1,
            RecordAction::Update => self.types_updated += 1,
            RecordAction::Delete => self.types_deleted += 1,
            RecordAction::Unchanged => self.types_unchanged += 1,
            RecordAction::Ignore => {}
        }
    }

    pub fn record_location(&mut self, action: RecordAction) {
        match action {
            RecordAction::Create => self.locations_created += 1,
            RecordAction::Update => self.locations_updated += 1,
            RecordAction::Delete => self.locations_deleted += 1,
            RecordAction::Unchanged => self.locations_unchanged += 1,
            RecordAction::Ignore => {}
        }
    }

    /// Records created, updated or deleted
    pub fn written_count(&self) -> usize {
        self.types_created
            + self.types_updated
            + self.types_deleted
            + self.locations_created
            + self.locations_updated
            + self.locations_deleted
    }

    pub fn unchanged_count(&self) -> usize {
        self.types_unchanged + self.locations_unchanged
    }

    /// Human-readable lines for the end user
    pub fn messages(&self) -> Vec<String> {
        vec![
            format!("Created {} new location types", self.types_created),
            format!("Updated {} existing location types", self.types_updated),
            format!("Deleted {} existing location types", self.types_deleted),
            format!("Created {} new locations", self.locations_created),
            format!("Updated {} existing locations", self.locations_updated),
            format!("Deleted {} existing locations", self.locations_deleted),
        ]
    }
}

/// Result of an import run
///
/// Validation problems are data: a run with errors returns normally, with
/// nothing written.
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub messages: Vec<String>,
    pub summary: ImportSummary,
    pub dry_run: bool,
}

impl ImportResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// No errors were found
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Result carrying a single error (e.g. a malformed workbook)
    pub fn from_error(error: impl ToString) -> Self {
        Self {
            errors: vec![error.to_string()],
            ..Self::default()
        }
    }
}

/// Failure while writing the plan; the transaction has been rolled back
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    #[error("failed to save location type '{code}': {source}")]
    Type {
        code: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to save location '{site_code}': {source}")]
    Location {
        site_code: String,
        #[source]
        source: StoreError,
    },

    #[error("location '{site_code}' could not be reached from the top of the tree")]
    Unreachable { site_code: String },

    #[error("location type '{code}' could not be reached from the top of the tree")]
    UnreachableType { code: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Exceptional failure of a run (validation problems are not errors)
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Row(#[from] RowFormatError),

    #[error("failed to load the existing tree: {0}")]
    Snapshot(#[source] StoreError),

    #[error(transparent)]
    Commit(#[from] CommitError),
}
