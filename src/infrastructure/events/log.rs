//! Log Event Sink
//!
//! Turns import events into log lines.

use crate::domain::ports::{ImportEvent, ImportEventSink};

/// Event sink that logs through `tracing`
///
/// Per-record events are only requested when `detailed` is set, since a large
/// upload produces one per row.
#[derive(Debug, Default)]
pub struct TracingEventSink {
    detailed: bool,
}

impl TracingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }
}

impl ImportEventSink for TracingEventSink {
    fn on_event(&self, event: ImportEvent) {
        match event {
            ImportEvent::Started {
                tenant,
                type_count,
                location_count,
            } => tracing::info!(%tenant, type_count, location_count, "import started"),
            ImportEvent::Validated {
                error_count,
                warning_count,
            } => tracing::info!(error_count, warning_count, "upload validated"),
            ImportEvent::TypeCommitted { code, action } => {
                tracing::debug!(%code, %action, "location type committed")
            }
            ImportEvent::LocationCommitted { site_code, action } => {
                tracing::debug!(%site_code, %action, "location committed")
            }
            ImportEvent::RolledBack { error } => tracing::warn!(%error, "import rolled back"),
            ImportEvent::Completed {
                written_count,
                unchanged_count,
                dry_run,
            } => tracing::info!(written_count, unchanged_count, dry_run, "import finished"),
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.detailed
    }
}
