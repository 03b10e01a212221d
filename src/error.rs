//! Error types for locsync
//!
//! Each layer has its own `thiserror` enum; `LocsyncError` gathers them for
//! callers that drive a whole run.

use thiserror::Error;

use crate::application::{ImportError, WorkbookError};
use crate::config::ConfigError;
use crate::domain::ports::StoreError;
use crate::infrastructure::{LockError, WorkbookReadError};

/// Result type alias for locsync operations
pub type LocsyncResult<T> = Result<T, LocsyncError>;

/// Main error type for locsync operations
#[derive(Error, Debug)]
pub enum LocsyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    WorkbookRead(#[from] WorkbookReadError),

    /// Malformed upload (sheet layout or row identity)
    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no tenant given; pass --tenant, set LOCSYNC_TENANT or [import] tenant")]
    MissingTenant,
}
