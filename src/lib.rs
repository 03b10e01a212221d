//! locsync - bulk location-hierarchy reconciliation
//!
//! Validates an uploaded location tree (a `types` sheet plus one sheet of
//! locations per type) against what a tenant already has, and commits the
//! minimal set of creates, updates and deletes in a single transaction.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{
    parse_workbook, ImportOptions, ImportResult, ImportSummary, NewLocationImporter, Sheet,
    Workbook,
};
pub use config::Config;
pub use domain::entities::{LocationCollection, LocationStub, LocationTypeStub};
pub use domain::ports::{ImportEvent, ImportEventSink, TreeStore};
pub use domain::services::{assert_acyclic, TreeError, TreeValidator};
pub use domain::value_objects::{Row, TreeRef};
pub use error::{LocsyncError, LocsyncResult};
