//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod import_events;
pub mod tree_store;

pub use import_events::{ImportEvent, ImportEventSink, NoopEventSink};
pub use tree_store::{StoreError, StoreResult, TreeStore};
