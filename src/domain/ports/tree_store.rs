//! TreeStore port - persistence of location types and locations
//!
//! The store is the only thing that touches persisted state. Writes made
//! between `begin` and `commit` must become visible together or, after
//! `rollback`, not at all.

use crate::domain::entities::{LocationRecord, TypeRecord};

/// Result type for tree store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Tree store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("location type '{code}' not found")]
    TypeNotFound { code: String },

    #[error("location '{location_id}' not found")]
    LocationNotFound { location_id: String },

    #[error("location type '{code}' refers to unknown parent type '{parent}'")]
    UnknownParentType { code: String, parent: String },

    #[error("location '{site_code}' refers to unknown location type '{location_type}'")]
    UnknownLocationType {
        site_code: String,
        location_type: String,
    },

    #[error("location '{site_code}' refers to unknown parent location '{parent_id}'")]
    UnknownParentLocation { site_code: String, parent_id: String },

    #[error("site code '{site_code}' is already used by location '{location_id}'")]
    DuplicateSiteCode {
        site_code: String,
        location_id: String,
    },

    #[error("location type '{code}' is still in use")]
    TypeInUse { code: String },

    #[error("location '{location_id}' still has child locations")]
    LocationHasChildren { location_id: String },

    #[error("no transaction in progress")]
    NoTransaction,

    #[error("a transaction is already in progress")]
    TransactionInProgress,

    #[error("invalid store file: {0}")]
    InvalidFormat(String),

    #[error("store backend failure: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Abstract tree persistence
///
/// Implementations are expected to reject writes that would break the tree:
/// unknown parents, dangling type references, deleting non-leaf nodes.
pub trait TreeStore {
    /// All location types of the tenant
    fn list_types(&self, tenant: &str) -> StoreResult<Vec<TypeRecord>>;

    /// All locations of the tenant
    fn list_locations(&self, tenant: &str) -> StoreResult<Vec<LocationRecord>>;

    fn get_type(&self, tenant: &str, code: &str) -> StoreResult<Option<TypeRecord>>;

    fn get_location(&self, tenant: &str, location_id: &str) -> StoreResult<Option<LocationRecord>>;

    /// Create or update a type, returning what was stored
    fn save_type(&mut self, tenant: &str, record: TypeRecord) -> StoreResult<TypeRecord>;

    fn delete_type(&mut self, tenant: &str, code: &str) -> StoreResult<()>;

    /// Create or update a location, returning what was stored
    fn save_location(&mut self, tenant: &str, record: LocationRecord)
        -> StoreResult<LocationRecord>;

    fn delete_location(&mut self, tenant: &str, location_id: &str) -> StoreResult<()>;

    /// Recompute ancestor/descendant indices after the tree changed shape
    fn rebuild_hierarchy_indices(&mut self, tenant: &str) -> StoreResult<()>;

    /// Start a transaction
    fn begin(&mut self) -> StoreResult<()>;

    /// Publish every write since `begin`
    fn commit(&mut self) -> StoreResult<()>;

    /// Discard every write since `begin`
    fn rollback(&mut self) -> StoreResult<()>;
}

impl<T: TreeStore + ?Sized> TreeStore for &mut T {
    fn list_types(&self, tenant: &str) -> StoreResult<Vec<TypeRecord>> {
        (**self).list_types(tenant)
    }

    fn list_locations(&self, tenant: &str) -> StoreResult<Vec<LocationRecord>> {
        (**self).list_locations(tenant)
    }

    fn get_type(&self, tenant: &str, code: &str) -> StoreResult<Option<TypeRecord>> {
        (**self).get_type(tenant, code)
    }

    fn get_location(&self, tenant: &str, location_id: &str) -> StoreResult<Option<LocationRecord>> {
        (**self).get_location(tenant, location_id)
    }

    fn save_type(&mut self, tenant: &str, record: TypeRecord) -> StoreResult<TypeRecord> {
        (**self).save_type(tenant, record)
    }

    fn delete_type(&mut self, tenant: &str, code: &str) -> StoreResult<()> {
        (**self).delete_type(tenant, code)
    }

    fn save_location(
        &mut self,
        tenant: &str,
        record: LocationRecord,
    ) -> StoreResult<LocationRecord> {
        (**self).save_location(tenant, record)
    }

    fn delete_location(&mut self, tenant: &str, location_id: &str) -> StoreResult<()> {
        (**self).delete_location(tenant, location_id)
    }

    fn rebuild_hierarchy_indices(&mut self, tenant: &str) -> StoreResult<()> {
        (**self).rebuild_hierarchy_indices(tenant)
    }

    fn begin(&mut self) -> StoreResult<()> {
        (**self).begin()
    }

    fn commit(&mut self) -> StoreResult<()> {
        (**self).commit()
    }

    fn rollback(&mut self) -> StoreResult<()> {
        (**self).rollback()
    }
}
