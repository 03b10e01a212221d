//! Commit planning service
//!
//! Pure domain logic: diff one stub against the existing tree and decide
//! what the commit walk does with it. No store access.

use crate::domain::entities::{
    LocationCollection, LocationDataModel, LocationRecord, LocationStub, LocationTypeStub,
    TypeRecord,
};
use crate::domain::value_objects::{RecordAction, TreeRef};

/// A planned write for a single location type
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedType {
    pub action: RecordAction,
    /// What the store should hold afterwards (or, for deletes, what it held)
    pub record: Option<TypeRecord>,
}

/// A planned write for a single location
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedLocation {
    pub action: RecordAction,
    pub record: Option<LocationRecord>,
}

impl PlannedType {
    /// Whether the store must be touched
    pub fn needs_save(&self) -> bool {
        self.action.is_write()
    }
}

impl PlannedLocation {
    pub fn needs_save(&self) -> bool {
        self.action.is_write()
    }
}

/// Diffs stubs against a snapshot
pub struct Planner<'a> {
    existing: &'a LocationCollection,
    data_model: &'a LocationDataModel,
}

impl<'a> Planner<'a> {
    pub fn new(existing: &'a LocationCollection, data_model: &'a LocationDataModel) -> Self {
        Self {
            existing,
            data_model,
        }
    }

    /// Plan a location type
    pub fn plan_type(&self, stub: &LocationTypeStub) -> PlannedType {
        let old = self.existing.type_by_code(&stub.code);

        if stub.do_delete {
            return match old {
                Some(old) => PlannedType {
                    action: RecordAction::Delete,
                    record: Some(old.clone()),
                },
                None => PlannedType {
                    action: RecordAction::Ignore,
                    record: None,
                },
            };
        }

        let mut record = TypeRecord::new(stub.code.as_str(), stub.name.as_str());
        record.parent_code = stub.parent_code.code().map(str::to_string);
        record.shares_cases = stub.shares_cases;
        record.view_descendants = stub.view_descendants;
        match &stub.expand_from {
            Some(TreeRef::Root) => record.expand_from_root = true,
            Some(TreeRef::Code(code)) => record.expand_from = Some(code.clone()),
            None => {}
        }
        record.sync_to = stub.sync_to.clone();

        let action = match old {
            None => RecordAction::Create,
            Some(old) if old.same_attributes(&record) => RecordAction::Unchanged,
            Some(_) => RecordAction::Update,
        };
        if let Some(old) = old {
            if action == RecordAction::Unchanged {
                record.last_modified = old.last_modified;
            }
        }

        tracing::debug!(code = %stub.code, %action, "planned location type");
        PlannedType {
            action,
            record: Some(record),
        }
    }

    /// Plan a location whose parent resolved to `parent_id`
    ///
    /// Identity must already be resolved; stubs flagged as new get a fresh id.
    pub fn plan_location(&self, stub: &LocationStub, parent_id: Option<&str>) -> PlannedLocation {
        let old = stub
            .location_id
            .as_deref()
            .filter(|_| !stub.is_new)
            .and_then(|id| self.existing.location_by_id(id));

        if stub.do_delete {
            return match old {
                Some(old) => PlannedLocation {
                    action: RecordAction::Delete,
                    record: Some(old.clone()),
                },
                None => PlannedLocation {
                    action: RecordAction::Ignore,
                    record: None,
                },
            };
        }

        let location_id = match (&stub.location_id, old) {
            (_, Some(old)) => old.location_id.clone(),
            (Some(id), None) => id.clone(),
            (None, None) => new_location_id(),
        };

        let (latitude, longitude) = stub.coordinates().unwrap_or_default();
        let empty = Default::default();
        let metadata = self.data_model.merge(
            old.map(|o| &o.metadata).unwrap_or(&empty),
            stub.custom_data.as_ref(),
            stub.delete_uncategorized_data,
        );

        // Site codes match case-insensitively; keep the stored spelling
        let site_code = match old {
            Some(old) if old.site_code.to_lowercase() == stub.site_code() => {
                old.site_code.as_str()
            }
            _ => stub.site_code(),
        };
        let mut record = LocationRecord::new(
            location_id,
            site_code,
            stub.name.as_str(),
            stub.location_type.as_str(),
        );
        record.parent_id = parent_id.map(str::to_string);
        record.external_id = stub.external_id.clone();
        record.latitude = latitude;
        record.longitude = longitude;
        record.metadata = metadata;

        let action = match old {
            None => RecordAction::Create,
            Some(old) if old.same_attributes(&record) => RecordAction::Unchanged,
            Some(_) => RecordAction::Update,
        };
        if let Some(old) = old {
            if action == RecordAction::Unchanged {
                record.last_modified = old.last_modified;
            }
        }

        tracing::debug!(site_code = %stub.site_code(), %action, "planned location");
        PlannedLocation {
            action,
            record: Some(record),
        }
    }
}

/// Fresh internal id for a created location
pub fn new_location_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
