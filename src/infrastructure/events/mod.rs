//! Event Sink Implementations
//!
//! - JsonEventSink: NDJSON output for CI/automation
//! - TracingEventSink: log lines

mod json;
mod log;

pub use json::JsonEventSink;
pub use log::TracingEventSink;
