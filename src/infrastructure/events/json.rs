//! JSON Event Sink
//!
//! Outputs import events as NDJSON for CI/automation consumption.

use crate::domain::ports::{ImportEvent, ImportEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl ImportEventSink for JsonEventSink {
    fn on_event(&self, event: ImportEvent) {
        let json = match event {
            ImportEvent::Started {
                tenant,
                type_count,
                location_count,
            } => {
                serde_json::json!({
                    "event": "start",
                    "command": "import",
                    "tenant": tenant,
                    "type_count": type_count,
                    "location_count": location_count,
                })
            }

            ImportEvent::Validated {
                error_count,
                warning_count,
            } => {
                serde_json::json!({
                    "event": "validated",
                    "command": "import",
                    "errors": error_count,
                    "warnings": warning_count,
                })
            }

            ImportEvent::TypeCommitted { code, action } => {
                serde_json::json!({
                    "event": "item_committed",
                    "command": "import",
                    "kind": "location_type",
                    "code": code,
                    "action": action,
                })
            }

            ImportEvent::LocationCommitted { site_code, action } => {
                serde_json::json!({
                    "event": "item_committed",
                    "command": "import",
                    "kind": "location",
                    "site_code": site_code,
                    "action": action,
                })
            }

            ImportEvent::RolledBack { error } => {
                serde_json::json!({
                    "event": "rolled_back",
                    "command": "import",
                    "error": error,
                })
            }

            ImportEvent::Completed {
                written_count,
                unchanged_count,
                dry_run,
            } => {
                let status = if dry_run { "dry_run" } else { "success" };
                serde_json::json!({
                    "event": "complete",
                    "command": "import",
                    "status": status,
                    "written": written_count,
                    "unchanged": unchanged_count,
                })
            }
        };

        self.write_event(json);
    }

    fn wants_detailed_events(&self) -> bool {
        true
    }
}
