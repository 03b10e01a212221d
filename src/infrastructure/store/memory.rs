//! In-memory tree store
//!
//! Per-tenant maps of types and locations, with the foreign-key checks a
//! relational store would apply. `begin` takes a copy of every tenant,
//! `rollback` restores it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{LocationRecord, TypeRecord};
use crate::domain::ports::{StoreError, StoreResult, TreeStore};

/// One tenant's tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantTree {
    #[serde(default)]
    pub types: Vec<TypeRecord>,
    #[serde(default)]
    pub locations: Vec<LocationRecord>,
}

#[derive(Debug, Clone, Default)]
struct TenantState {
    types: BTreeMap<String, TypeRecord>,
    locations: BTreeMap<String, LocationRecord>,
    /// location_id -> ancestor ids, top first; rebuilt on demand
    paths: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone)]
struct Checkpoint {
    tenants: BTreeMap<String, TenantState>,
    write_count: usize,
}

#[derive(Debug, Default)]
pub struct InMemoryTreeStore {
    tenants: BTreeMap<String, TenantState>,
    checkpoint: Option<Checkpoint>,
    write_count: usize,
}

impl InMemoryTreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load trees without FK checks (records may arrive in any order)
    pub fn from_trees(trees: BTreeMap<String, TenantTree>) -> Self {
        let mut store = Self::new();
        for (tenant, tree) in trees {
            let state = store.tenants.entry(tenant.clone()).or_default();
            for record in tree.types {
                state.types.insert(record.code.clone(), record);
            }
            for record in tree.locations {
                state.locations.insert(record.location_id.clone(), record);
            }
            store.rebuild_paths(&tenant);
        }
        store
    }

    /// Every tenant's tree, in a stable order
    pub fn trees(&self) -> BTreeMap<String, TenantTree> {
        self.tenants
            .iter()
            .map(|(tenant, state)| {
                (
                    tenant.clone(),
                    TenantTree {
                        types: state.types.values().cloned().collect(),
                        locations: state.locations.values().cloned().collect(),
                    },
                )
            })
            .collect()
    }

    /// Number of saves and deletes performed (rolled-back writes excluded)
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    pub fn in_transaction(&self) -> bool {
        self.checkpoint.is_some()
    }

    /// Ancestor ids of a location, top first, as of the last index rebuild
    pub fn ancestors_of(&self, tenant: &str, location_id: &str) -> Vec<String> {
        self.tenants
            .get(tenant)
            .and_then(|state| state.paths.get(location_id))
            .cloned()
            .unwrap_or_default()
    }

    /// Ids of every location below `location_id`, as of the last index rebuild
    pub fn descendants_of(&self, tenant: &str, location_id: &str) -> Vec<String> {
        let Some(state) = self.tenants.get(tenant) else {
            return Vec::new();
        };
        state
            .paths
            .iter()
            .filter(|(_, path)| path.iter().any(|id| id == location_id))
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn tenant(&self, tenant: &str) -> Option<&TenantState> {
        self.tenants.get(tenant)
    }

    fn tenant_mut(&mut self, tenant: &str) -> &mut TenantState {
        self.tenants.entry(tenant.to_string()).or_default()
    }

    fn rebuild_paths(&mut self, tenant: &str) {
        let state = self.tenant_mut(tenant);
        let mut paths = BTreeMap::new();
        for id in state.locations.keys() {
            let mut path = Vec::new();
            let mut current = state.locations.get(id).and_then(|l| l.parent_id.clone());
            while let Some(parent_id) = current {
                if path.contains(&parent_id) || path.len() > state.locations.len() {
                    break;
                }
                current = state
                    .locations
                    .get(&parent_id)
                    .and_then(|l| l.parent_id.clone());
                path.push(parent_id);
            }
            path.reverse();
            paths.insert(id.clone(), path);
        }
        state.paths = paths;
    }
}

impl TreeStore for InMemoryTreeStore {
    fn list_types(&self, tenant: &str) -> StoreResult<Vec<TypeRecord>> {
        Ok(self
            .tenant(tenant)
            .map(|s| s.types.values().cloned().collect())
            .unwrap_or_default())
    }

    fn list_locations(&self, tenant: &str) -> StoreResult<Vec<LocationRecord>> {
        Ok(self
            .tenant(tenant)
            .map(|s| s.locations.values().cloned().collect())
            .unwrap_or_default())
    }

    fn get_type(&self, tenant: &str, code: &str) -> StoreResult<Option<TypeRecord>> {
        Ok(self.tenant(tenant).and_then(|s| s.types.get(code)).cloned())
    }

    fn get_location(&self, tenant: &str, location_id: &str) -> StoreResult<Option<LocationRecord>> {
        Ok(self
            .tenant(tenant)
            .and_then(|s| s.locations.get(location_id))
            .cloned())
    }

    fn save_type(&mut self, tenant: &str, record: TypeRecord) -> StoreResult<TypeRecord> {
        let state = self.tenant_mut(tenant);
        if let Some(parent) = record.parent_code.as_deref() {
            if parent == record.code || !state.types.contains_key(parent) {
                return Err(StoreError::UnknownParentType {
                    code: record.code.clone(),
                    parent: parent.to_string(),
                });
            }
        }
        state.types.insert(record.code.clone(), record.clone());
        self.write_count += 1;
        Ok(record)
    }

    fn delete_type(&mut self, tenant: &str, code: &str) -> StoreResult<()> {
        let state = self.tenant_mut(tenant);
        if !state.types.contains_key(code) {
            return Err(StoreError::TypeNotFound {
                code: code.to_string(),
            });
        }
        let has_child_type = state
            .types
            .values()
            .any(|t| t.parent_code.as_deref() == Some(code));
        let has_location = state.locations.values().any(|l| l.location_type == code);
        if has_child_type || has_location {
            return Err(StoreError::TypeInUse {
                code: code.to_string(),
            });
        }
        state.types.remove(code);
        self.write_count += 1;
        Ok(())
    }

    fn save_location(
        &mut self,
        tenant: &str,
        record: LocationRecord,
    ) -> StoreResult<LocationRecord> {
        let state = self.tenant_mut(tenant);
        if !state.types.contains_key(&record.location_type) {
            return Err(StoreError::UnknownLocationType {
                site_code: record.site_code.clone(),
                location_type: record.location_type.clone(),
            });
        }
        if let Some(parent_id) = record.parent_id.as_deref() {
            if parent_id == record.location_id || !state.locations.contains_key(parent_id) {
                return Err(StoreError::UnknownParentLocation {
                    site_code: record.site_code.clone(),
                    parent_id: parent_id.to_string(),
                });
            }
        }
        if let Some(other) = state.locations.values().find(|l| {
            l.location_id != record.location_id
                && l.site_code.eq_ignore_ascii_case(&record.site_code)
        }) {
            return Err(StoreError::DuplicateSiteCode {
                site_code: record.site_code.clone(),
                location_id: other.location_id.clone(),
            });
        }
        state
            .locations
            .insert(record.location_id.clone(), record.clone());
        self.write_count += 1;
        Ok(record)
    }

    fn delete_location(&mut self, tenant: &str, location_id: &str) -> StoreResult<()> {
        let state = self.tenant_mut(tenant);
        if !state.locations.contains_key(location_id) {
            return Err(StoreError::LocationNotFound {
                location_id: location_id.to_string(),
            });
        }
        if state
            .locations
            .values()
            .any(|l| l.parent_id.as_deref() == Some(location_id))
        {
            return Err(StoreError::LocationHasChildren {
                location_id: location_id.to_string(),
            });
        }
        state.locations.remove(location_id);
        self.write_count += 1;
        Ok(())
    }

    fn rebuild_hierarchy_indices(&mut self, tenant: &str) -> StoreResult<()> {
        self.rebuild_paths(tenant);
        tracing::debug!(tenant, "rebuilt hierarchy indices");
        Ok(())
    }

    fn begin(&mut self) -> StoreResult<()> {
        if self.checkpoint.is_some() {
            return Err(StoreError::TransactionInProgress);
        }
        self.checkpoint = Some(Checkpoint {
            tenants: self.tenants.clone(),
            write_count: self.write_count,
        });
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.checkpoint
            .take()
            .map(|_| ())
            .ok_or(StoreError::NoTransaction)
    }

    fn rollback(&mut self) -> StoreResult<()> {
        let checkpoint = self.checkpoint.take().ok_or(StoreError::NoTransaction)?;
        self.tenants = checkpoint.tenants;
        self.write_count = checkpoint.write_count;
        Ok(())
    }
}
