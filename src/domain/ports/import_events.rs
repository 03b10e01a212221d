//! Import Event Port
//!
//! Observable progress of an import run: JSON event streams, log lines,
//! or nothing at all.

use crate::domain::value_objects::RecordAction;

/// Event emitted during an import run
#[derive(Debug, Clone, PartialEq)]
pub enum ImportEvent {
    /// Run started
    Started {
        tenant: String,
        type_count: usize,
        location_count: usize,
    },

    /// Validation finished
    Validated {
        error_count: usize,
        warning_count: usize,
    },

    /// A location type was written (or found unchanged)
    TypeCommitted { code: String, action: RecordAction },

    /// A location was written (or found unchanged)
    LocationCommitted {
        site_code: String,
        action: RecordAction,
    },

    /// The transaction was rolled back
    RolledBack { error: String },

    /// Run completed
    Completed {
        written_count: usize,
        unchanged_count: usize,
        dry_run: bool,
    },
}

/// Trait for receiving import events
pub trait ImportEventSink: Send + Sync {
    fn on_event(&self, event: ImportEvent);

    /// Check if this sink wants per-record events
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl ImportEventSink for NoopEventSink {
    fn on_event(&self, _event: ImportEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
