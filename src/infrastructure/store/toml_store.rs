//! TOML Tree Store
//!
//! Keeps every tenant's tree in one TOML file. Reads and writes go through an
//! [`InMemoryTreeStore`]; the file is rewritten on `commit`, or after each
//! write when no transaction is open. Rewrites go through a temporary file in
//! the same directory so a crash never leaves a half-written store behind.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::entities::{LocationRecord, TypeRecord};
use crate::domain::ports::{StoreError, StoreResult, TreeStore};

use super::memory::{InMemoryTreeStore, TenantTree};

const STORE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    tenants: BTreeMap<String, TenantTree>,
}

pub struct TomlTreeStore {
    path: PathBuf,
    inner: InMemoryTreeStore,
}

impl TomlTreeStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let inner = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let file: StoreFile = toml::from_str(&content)
                .map_err(|e| StoreError::InvalidFormat(format!("{}: {}", path.display(), e)))?;
            if file.version != STORE_VERSION {
                return Err(StoreError::InvalidFormat(format!(
                    "{}: unsupported store version {}",
                    path.display(),
                    file.version
                )));
            }
            InMemoryTreeStore::from_trees(file.tenants)
        } else {
            InMemoryTreeStore::new()
        };
        tracing::debug!(path = %path.display(), "opened tree store");
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory view of the store
    pub fn inner(&self) -> &InMemoryTreeStore {
        &self.inner
    }

    fn persist(&self) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let file = StoreFile {
            version: STORE_VERSION,
            tenants: self.inner.trees(),
        };
        let content =
            toml::to_string_pretty(&file).map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
        temp.write_all(content.as_bytes())?;
        temp.flush()?;
        temp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        tracing::debug!(path = %self.path.display(), "persisted tree store");
        Ok(())
    }

    fn persist_outside_transaction(&self) -> StoreResult<()> {
        if self.inner.in_transaction() {
            Ok(())
        } else {
            self.persist()
        }
    }
}

impl TreeStore for TomlTreeStore {
    fn list_types(&self, tenant: &str) -> StoreResult<Vec<TypeRecord>> {
        self.inner.list_types(tenant)
    }

    fn list_locations(&self, tenant: &str) -> StoreResult<Vec<LocationRecord>> {
        self.inner.list_locations(tenant)
    }

    fn get_type(&self, tenant: &str, code: &str) -> StoreResult<Option<TypeRecord>> {
        self.inner.get_type(tenant, code)
    }

    fn get_location(&self, tenant: &str, location_id: &str) -> StoreResult<Option<LocationRecord>> {
        self.inner.get_location(tenant, location_id)
    }

    fn save_type(&mut self, tenant: &str, record: TypeRecord) -> StoreResult<TypeRecord> {
        let saved = self.inner.save_type(tenant, record)?;
        self.persist_outside_transaction()?;
        Ok(saved)
    }

    fn delete_type(&mut self, tenant: &str, code: &str) -> StoreResult<()> {
        self.inner.delete_type(tenant, code)?;
        self.persist_outside_transaction()
    }

    fn save_location(
        &mut self,
        tenant: &str,
        record: LocationRecord,
    ) -> StoreResult<LocationRecord> {
        let saved = self.inner.save_location(tenant, record)?;
        self.persist_outside_transaction()?;
        Ok(saved)
    }

    fn delete_location(&mut self, tenant: &str, location_id: &str) -> StoreResult<()> {
        self.inner.delete_location(tenant, location_id)?;
        self.persist_outside_transaction()
    }

    fn rebuild_hierarchy_indices(&mut self, tenant: &str) -> StoreResult<()> {
        self.inner.rebuild_hierarchy_indices(tenant)
    }

    fn begin(&mut self) -> StoreResult<()> {
        self.inner.begin()
    }

    fn commit(&mut self) -> StoreResult<()> {
        if let Err(err) = self.persist() {
            if let Err(rollback_err) = self.inner.rollback() {
                tracing::warn!(error = %rollback_err, "rollback after failed write failed");
            }
            return Err(err);
        }
        self.inner.commit()
    }

    fn rollback(&mut self) -> StoreResult<()> {
        self.inner.rollback()
    }
}
