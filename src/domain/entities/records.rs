//! Persisted shapes of location types and locations
//!
//! These are what the tree store holds. Stubs are diffed against them and
//! turned into them at commit time.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::TreeRef;

/// A stored location type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRecord {
    pub code: String,
    pub name: String,
    /// Code of the parent type; `None` for top-level types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
    #[serde(default)]
    pub shares_cases: bool,
    #[serde(default)]
    pub view_descendants: bool,
    /// Ancestor type to derive consumption data from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand_from: Option<String>,
    /// Derive consumption data from the root
    #[serde(default)]
    pub expand_from_root: bool,
    /// Descendant type to propagate data down to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_to: Option<String>,
    pub last_modified: DateTime<Utc>,
}

impl TypeRecord {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            parent_code: None,
            shares_cases: false,
            view_descendants: false,
            expand_from: None,
            expand_from_root: false,
            sync_to: None,
            last_modified: Utc::now(),
        }
    }

    pub fn with_parent(mut self, parent_code: impl Into<String>) -> Self {
        self.parent_code = Some(parent_code.into());
        self
    }

    /// Parent as a tree reference
    pub fn parent(&self) -> TreeRef {
        TreeRef::from_code(self.parent_code.as_deref())
    }

    /// `expand_from` as a tree reference (`TOP` when expanding from the root)
    pub fn expansion_source(&self) -> Option<TreeRef> {
        if self.expand_from_root {
            Some(TreeRef::Root)
        } else {
            self.expand_from.clone().map(TreeRef::Code)
        }
    }

    /// Attribute equality, ignoring bookkeeping fields
    pub fn same_attributes(&self, other: &TypeRecord) -> bool {
        self.code == other.code
            && self.name == other.name
            && self.parent_code == other.parent_code
            && self.shares_cases == other.shares_cases
            && self.view_descendants == other.view_descendants
            && self.expansion_source() == other.expansion_source()
            && self.sync_to == other.sync_to
    }
}

/// A stored location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub location_id: String,
    pub site_code: String,
    pub name: String,
    /// Code of the owning type
    pub location_type: String,
    /// `location_id` of the parent location; `None` at the top
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    pub last_modified: DateTime<Utc>,
}

impl LocationRecord {
    pub fn new(
        location_id: impl Into<String>,
        site_code: impl Into<String>,
        name: impl Into<String>,
        location_type: impl Into<String>,
    ) -> Self {
        Self {
            location_id: location_id.into(),
            site_code: site_code.into(),
            name: name.into(),
            location_type: location_type.into(),
            parent_id: None,
            external_id: None,
            latitude: None,
            longitude: None,
            metadata: BTreeMap::new(),
            last_modified: Utc::now(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Attribute equality, ignoring bookkeeping fields
    pub fn same_attributes(&self, other: &LocationRecord) -> bool {
        self.location_id == other.location_id
            && self.site_code == other.site_code
            && self.name == other.name
            && self.location_type == other.location_type
            && self.parent_id == other.parent_id
            && self.external_id == other.external_id
            && self.latitude == other.latitude
            && self.longitude == other.longitude
            && self.metadata == other.metadata
    }
}
