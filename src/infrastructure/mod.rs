//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `store/` - Tree stores (in-memory, TOML file) and the tenant lock
//! - `events/` - Event sinks (NDJSON, tracing)
//! - `workbook/` - Workbook readers (JSON)

pub mod events;
pub mod store;
pub mod workbook;

// Re-export for convenience
pub use events::{JsonEventSink, TracingEventSink};
pub use store::{InMemoryTreeStore, LockError, TenantLock, TomlTreeStore};
pub use workbook::{JsonWorkbookReader, WorkbookReadError};
