//! LocationCollection - read-only snapshot of a tenant's persisted tree
//!
//! Loaded once per run. Lookups are computed on first use and cached for
//! the lifetime of the snapshot.

use std::cell::OnceCell;
use std::collections::HashMap;

use crate::domain::entities::{LocationRecord, TypeRecord};
use crate::domain::ports::{StoreResult, TreeStore};
use crate::domain::value_objects::TreeRef;

#[derive(Debug, Default)]
pub struct LocationCollection {
    types: Vec<TypeRecord>,
    locations: Vec<LocationRecord>,
    locations_by_id: OnceCell<HashMap<String, usize>>,
    locations_by_site_code: OnceCell<HashMap<String, usize>>,
    types_by_code: OnceCell<HashMap<String, usize>>,
}

impl LocationCollection {
    /// Read every type and location the tenant currently owns
    pub fn load<S: TreeStore + ?Sized>(store: &S, tenant: &str) -> StoreResult<Self> {
        let types = store.list_types(tenant)?;
        let locations = store.list_locations(tenant)?;
        tracing::debug!(
            tenant,
            types = types.len(),
            locations = locations.len(),
            "loaded existing tree"
        );
        Ok(Self::from_records(types, locations))
    }

    pub fn from_records(types: Vec<TypeRecord>, locations: Vec<LocationRecord>) -> Self {
        Self {
            types,
            locations,
            ..Self::default()
        }
    }

    pub fn types(&self) -> &[TypeRecord] {
        &self.types
    }

    pub fn locations(&self) -> &[LocationRecord] {
        &self.locations
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.locations.is_empty()
    }

    fn id_index(&self) -> &HashMap<String, usize> {
        self.locations_by_id.get_or_init(|| {
            self.locations
                .iter()
                .enumerate()
                .map(|(i, l)| (l.location_id.clone(), i))
                .collect()
        })
    }

    fn site_code_index(&self) -> &HashMap<String, usize> {
        self.locations_by_site_code.get_or_init(|| {
            self.locations
                .iter()
                .enumerate()
                .map(|(i, l)| (l.site_code.to_lowercase(), i))
                .collect()
        })
    }

    fn type_index(&self) -> &HashMap<String, usize> {
        self.types_by_code.get_or_init(|| {
            self.types
                .iter()
                .enumerate()
                .map(|(i, t)| (t.code.clone(), i))
                .collect()
        })
    }

    pub fn location_by_id(&self, location_id: &str) -> Option<&LocationRecord> {
        self.id_index()
            .get(location_id)
            .map(|&i| &self.locations[i])
    }

    /// Site codes are matched case-insensitively
    pub fn location_by_site_code(&self, site_code: &str) -> Option<&LocationRecord> {
        self.site_code_index()
            .get(&site_code.to_lowercase())
            .map(|&i| &self.locations[i])
    }

    pub fn type_by_code(&self, code: &str) -> Option<&TypeRecord> {
        self.type_index().get(code).map(|&i| &self.types[i])
    }

    /// Parent of a stored location, in site-code space
    pub fn parent_site_code(&self, location: &LocationRecord) -> TreeRef {
        location
            .parent_id
            .as_deref()
            .and_then(|id| self.location_by_id(id))
            .map(|parent| TreeRef::code_of(parent.site_code.to_lowercase()))
            .unwrap_or(TreeRef::Root)
    }

    /// Number of ancestors of a stored location (0 at the top)
    pub fn location_depth(&self, location_id: &str) -> usize {
        let mut depth = 0;
        let mut current = self.location_by_id(location_id);
        while let Some(parent) = current
            .and_then(|l| l.parent_id.as_deref())
            .and_then(|id| self.location_by_id(id))
        {
            depth += 1;
            if depth > self.locations.len() {
                break;
            }
            current = Some(parent);
        }
        depth
    }

    /// Number of ancestors of a stored type (0 at the top)
    pub fn type_depth(&self, code: &str) -> usize {
        let mut depth = 0;
        let mut current = self.type_by_code(code);
        while let Some(parent) = current
            .and_then(|t| t.parent_code.as_deref())
            .and_then(|c| self.type_by_code(c))
        {
            depth += 1;
            if depth > self.types.len() {
                break;
            }
            current = Some(parent);
        }
        depth
    }
}
