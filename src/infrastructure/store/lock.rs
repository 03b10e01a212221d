//! Per-tenant advisory lock
//!
//! An import must be the only writer of a tenant's tree while it runs. The
//! lock is an exclusive `fs2` lock on `<store>.<tenant>.lock`, released on
//! drop.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fs2::FileExt;

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("tenant '{tenant}' is being imported by another process")]
    Busy { tenant: String },

    #[error("failed to lock {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct TenantLock {
    file: File,
    path: PathBuf,
}

impl TenantLock {
    /// Lock file path for a tenant of the store at `store_path`
    pub fn path_for(store_path: &Path, tenant: &str) -> PathBuf {
        let safe: String = tenant
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let mut name = store_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "store".into());
        name.push(format!(".{}.lock", safe));
        store_path.with_file_name(name)
    }

    /// Block until the lock is held
    pub fn acquire(store_path: &Path, tenant: &str) -> Result<Self, LockError> {
        let (file, path) = Self::open(store_path, tenant)?;
        file.lock_exclusive()
            .map_err(|source| LockError::Io {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(tenant, path = %path.display(), "acquired tenant lock");
        Ok(Self { file, path })
    }

    /// Take the lock or fail immediately when another holder has it
    pub fn try_acquire(store_path: &Path, tenant: &str) -> Result<Self, LockError> {
        let (file, path) = Self::open(store_path, tenant)?;
        if file.try_lock_exclusive().is_err() {
            return Err(LockError::Busy {
                tenant: tenant.to_string(),
            });
        }
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(store_path: &Path, tenant: &str) -> Result<(File, PathBuf), LockError> {
        let path = Self::path_for(store_path, tenant);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LockError::Io {
                path: path.clone(),
                source,
            })?;
        }
        let file = File::create(&path).map_err(|source| LockError::Io {
            path: path.clone(),
            source,
        })?;
        Ok((file, path))
    }
}

impl Drop for TenantLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
