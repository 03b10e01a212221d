//! Import Module
//!
//! Reconciles a tenant's location tree with an upload.
//!
//! ## Structure
//!
//! - `options` - `ImportOptions`
//! - `result` - `ImportResult`, `ImportSummary`, `CommitError`, `ImportError`
//! - `use_case` - `NewLocationImporter`
//!
//! ## Usage
//!
//! ```ignore
//! use locsync::application::import::{ImportOptions, NewLocationImporter};
//!
//! let mut importer = NewLocationImporter::from_workbook(&mut store, &workbook)?;
//! let result = importer.run(&ImportOptions::new("demo"))?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::ImportOptions;
pub use result::{CommitError, ImportError, ImportResult, ImportSummary};
pub use use_case::NewLocationImporter;
