//! Tree validator
//!
//! Checks a proposed set of type and location stubs against each other and
//! against the existing tree. Problems are returned as human-readable
//! messages; an empty list means the upload can be committed.
//!
//! Checks run in stages. A stage only runs when every earlier stage it
//! depends on came back clean:
//!
//! 1. row completeness, geodata and custom data
//! 2. listed ids unknown to the tenant
//! 3. uniqueness of type codes, site codes and location ids
//! 4. existing types and locations missing from the upload
//! 5. type tree shape and expansion settings (only if 1-4 are clean)
//! 6. location tree shape (only if 5 is clean)
//! 7. sibling names and field limits

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::domain::entities::{
    LocationCollection, LocationDataModel, LocationStub, LocationTypeStub, RowFormatError,
};
use crate::domain::services::tree_checker::{assert_acyclic, compute_expansion_bounds, TreeError};
use crate::domain::value_objects::{TreeRef, ROOT_CODE};

/// Longest name or site code the store accepts
pub const MAX_FIELD_LENGTH: usize = 255;

#[derive(Debug)]
pub struct TreeValidator<'a> {
    types: Vec<LocationTypeStub>,
    locations: Vec<LocationStub>,
    existing: Option<&'a LocationCollection>,
    data_model: LocationDataModel,
    errors: OnceCell<Vec<String>>,
}

impl<'a> TreeValidator<'a> {
    /// Resolve identities of every location stub against `existing`.
    ///
    /// `existing` is `None` for a tenant with no prior state; the
    /// "everything must be listed" checks are skipped then.
    ///
    /// Delete-marked rows that name no existing location are kept and
    /// flagged as new, so they surface as warnings and are ignored on
    /// commit. Any other unresolvable row is a [`RowFormatError`].
    pub fn new(
        types: Vec<LocationTypeStub>,
        mut locations: Vec<LocationStub>,
        existing: Option<&'a LocationCollection>,
    ) -> Result<Self, RowFormatError> {
        for location in &mut locations {
            match location.autoset_identity(existing) {
                Ok(()) => {}
                Err(RowFormatError::UnresolvableIdentity { .. }) if location.do_delete => {
                    location.is_new = true;
                }
                Err(err) => return Err(err),
            }

            if location.do_delete && !location.is_new {
                let known = match (existing, location.location_id.as_deref()) {
                    (Some(existing), Some(id)) => existing.location_by_id(id).is_some(),
                    _ => false,
                };
                if !known {
                    location.is_new = true;
                }
            }
        }

        Ok(Self {
            types,
            locations,
            existing,
            data_model: LocationDataModel::default(),
            errors: OnceCell::new(),
        })
    }

    /// Check provided custom data against `data_model`
    pub fn with_data_model(mut self, data_model: LocationDataModel) -> Self {
        self.data_model = data_model;
        self.errors = OnceCell::new();
        self
    }

    pub fn types(&self) -> &[LocationTypeStub] {
        &self.types
    }

    pub fn locations(&self) -> &[LocationStub] {
        &self.locations
    }

    /// Hand the resolved stubs back for committing
    pub fn into_stubs(self) -> (Vec<LocationTypeStub>, Vec<LocationStub>) {
        (self.types, self.locations)
    }

    fn live_types(&self) -> impl Iterator<Item = &LocationTypeStub> {
        self.types.iter().filter(|t| !t.do_delete)
    }

    fn live_locations(&self) -> impl Iterator<Item = &LocationStub> {
        self.locations.iter().filter(|l| !l.do_delete)
    }

    /// Rows whose deletion will be skipped
    fn ignored_deletes(&self) -> impl Iterator<Item = &LocationStub> {
        self.locations.iter().filter(|l| l.do_delete && l.is_new)
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// Non-blocking problems
    pub fn warnings(&self) -> Vec<String> {
        self.ignored_deletes()
            .map(|l| {
                format!(
                    "Location deletion in sheet '{}', row '{}' is ignored, as the location does not exist",
                    l.location_type, l.index
                )
            })
            .collect()
    }

    /// All blocking problems, computed once
    pub fn errors(&self) -> &[String] {
        self.errors.get_or_init(|| self.compute_errors())
    }

    fn compute_errors(&self) -> Vec<String> {
        let mut errors = self.row_errors();
        errors.extend(self.unknown_location_ids());
        errors.extend(self.uniqueness_errors());
        if self.existing.is_some() {
            errors.extend(self.unlisted_types());
            errors.extend(self.unlisted_locations());
        }
        if !errors.is_empty() {
            return errors;
        }

        let type_errors = self.type_tree_errors();
        if !type_errors.is_empty() {
            return type_errors;
        }

        let mut errors = self.location_tree_errors();
        errors.extend(self.sibling_name_errors());
        errors.extend(self.field_errors());
        errors
    }

    fn row_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for l in &self.locations {
            if !l.has_identity() {
                errors.push(format!(
                    "Location in sheet '{}' at index {} has no site_code and location_id - at least one of them should be listed",
                    l.location_type, l.index
                ));
            }
        }
        for l in &self.locations {
            if l.coordinates().is_err() {
                errors.push(format!(
                    "latitude/longitude 'lat-{}, lng-{}' for location in sheet '{}' at index {} should be valid decimal numbers.",
                    l.latitude.as_deref().unwrap_or_default(),
                    l.longitude.as_deref().unwrap_or_default(),
                    l.location_type,
                    l.index
                ));
            }
        }
        for l in &self.locations {
            let Some(data) = &l.custom_data else {
                continue;
            };
            if let Some(problem) = self.data_model.validate(data) {
                errors.push(format!(
                    "Problem with custom data for location '{}', in sheet '{}', at index '{}' - '{}'",
                    l.site_code(),
                    l.location_type,
                    l.index,
                    problem
                ));
            }
        }
        errors
    }

    fn unknown_location_ids(&self) -> Vec<String> {
        let Some(existing) = self.existing else {
            return Vec::new();
        };
        let mut reported = HashSet::new();
        self.locations
            .iter()
            .filter(|l| !(l.do_delete && l.is_new))
            .filter_map(|l| l.location_id.as_deref().map(|id| (id, l)))
            .filter(|(id, _)| existing.location_by_id(id).is_none())
            .filter(|(id, _)| reported.insert(*id))
            .map(|(id, l)| {
                format!(
                    "Location 'id: {}' is not found in your domain. It's listed in the sheet {} at row {}",
                    id, l.location_type, l.index
                )
            })
            .collect()
    }

    fn uniqueness_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for t in &self.types {
            if t.code.is_empty() {
                errors.push(format!("Location type at index {} has no code", t.index));
            } else if t.code.eq_ignore_ascii_case(ROOT_CODE) {
                errors.push(format!(
                    "Location type code '{}' is reserved and cannot be used",
                    t.code
                ));
            }
        }

        for (code, count) in duplicates(self.types.iter().map(|t| t.code.as_str())) {
            errors.push(format!(
                "Location type code '{}' is used {} times - they should be unique",
                code, count
            ));
        }
        for (code, count) in duplicates(self.locations.iter().map(|l| l.site_code())) {
            errors.push(format!(
                "Location site_code '{}' is used {} times - they should be unique",
                code, count
            ));
        }
        for (id, count) in duplicates(
            self.locations
                .iter()
                .map(|l| l.location_id.as_deref().unwrap_or_default()),
        ) {
            errors.push(format!(
                "Location location_id '{}' is listed {} times - they should be listed once",
                id, count
            ));
        }
        errors
    }

    fn unlisted_types(&self) -> Vec<String> {
        let Some(existing) = self.existing else {
            return Vec::new();
        };
        let listed: HashSet<&str> = self.types.iter().map(|t| t.code.as_str()).collect();
        let unlisted: BTreeSet<&str> = existing
            .types()
            .iter()
            .map(|t| t.code.as_str())
            .filter(|code| !listed.contains(code))
            .collect();
        unlisted
            .into_iter()
            .map(|code| {
                format!(
                    "Location type code '{}' is not listed in the upload. All types should be listed, including ones you don't intend to change",
                    code
                )
            })
            .collect()
    }

    fn unlisted_locations(&self) -> Vec<String> {
        let Some(existing) = self.existing else {
            return Vec::new();
        };
        let listed: HashSet<&str> = self
            .locations
            .iter()
            .filter_map(|l| l.location_id.as_deref())
            .collect();
        existing
            .locations()
            .iter()
            .filter(|l| !listed.contains(l.location_id.as_str()))
            .map(|l| {
                format!(
                    "Location '{}' (id: {}) is not listed in the upload. All locations should be listed",
                    l.site_code, l.location_id
                )
            })
            .collect()
    }

    fn type_tree_errors(&self) -> Vec<String> {
        let edges: Vec<(String, TreeRef)> = self
            .live_types()
            .map(|t| (t.code.clone(), t.parent_code.clone()))
            .collect();

        match assert_acyclic(&edges) {
            Err(TreeError::DanglingParent { affected }) => {
                return affected
                    .iter()
                    .map(|code| format!("Location Type '{}' refers to a parent which doesn't exist", code))
                    .collect();
            }
            Err(TreeError::Cycle { affected }) => {
                return affected
                    .iter()
                    .map(|code| format!("Location Type '{}' has a parentage that loops", code))
                    .collect();
            }
            Ok(()) => {}
        }

        let bounds = compute_expansion_bounds(&edges);
        let mut errors = Vec::new();
        for t in self.live_types() {
            if let Some(expand_from) = &t.expand_from {
                if !bounds.valid_ancestors_of(&t.code).contains(expand_from) {
                    errors.push(format!(
                        "Location Type '{}' has an invalid expand_from '{}'; it must be the type itself or one of its ancestors",
                        t.code, expand_from
                    ));
                }
            }
            if let Some(sync_to) = &t.sync_to {
                if !bounds.valid_descendants_of(&t.code).contains(sync_to) {
                    errors.push(format!(
                        "Location Type '{}' has an invalid sync_to '{}'; it must be the type itself or one of its descendants",
                        t.code, sync_to
                    ));
                }
            }
        }
        errors
    }

    fn location_tree_errors(&self) -> Vec<String> {
        let types: HashMap<&str, &LocationTypeStub> =
            self.live_types().map(|t| (t.code.as_str(), t)).collect();
        let locations: HashMap<&str, &LocationStub> =
            self.live_locations().map(|l| (l.site_code(), l)).collect();

        self.live_locations()
            .filter_map(|location| {
                let Some(location_type) = types.get(location.location_type.as_str()) else {
                    return Some(format!(
                        "Location '{}' in sheet points to a nonexistent or to be deleted location-type '{}'",
                        location.site_code(),
                        location.location_type
                    ));
                };

                let Some(parent_type) = location_type.parent_code.code() else {
                    if location.parent_code.is_root() {
                        return None;
                    }
                    return Some(format!(
                        "Location '{}' is a '{}' and should not have a parent",
                        location.site_code(),
                        location.location_type
                    ));
                };

                let parent = location
                    .parent_code
                    .code()
                    .and_then(|code| locations.get(code));
                match parent {
                    None => Some(format!(
                        "Location '{}' does not have a parent set or its parent is being deleted",
                        location.site_code()
                    )),
                    Some(parent) if parent.location_type != parent_type => Some(format!(
                        "Location '{}' is a '{}', so it should have a parent that is a '{}'",
                        location.site_code(),
                        location.location_type,
                        parent_type
                    )),
                    Some(_) => None,
                }
            })
            .collect()
    }

    fn sibling_name_errors(&self) -> Vec<String> {
        let mut by_parent: BTreeMap<&TreeRef, Vec<&str>> = BTreeMap::new();
        for l in self.live_locations() {
            by_parent.entry(&l.parent_code).or_default().push(l.name.as_str());
        }

        let mut errors = Vec::new();
        for (parent, names) in by_parent {
            for (name, count) in duplicates(names.into_iter()) {
                errors.push(format!(
                    "There are {} locations with the name '{}' under the parent '{}'",
                    count, name, parent
                ));
            }
        }
        errors
    }

    fn field_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for l in self.live_locations() {
            let mut problems = Vec::new();
            if l.name.trim().is_empty() {
                problems.push("name: This field cannot be blank.".to_string());
            }
            for (field, value) in [("name", l.name.as_str()), ("site_code", l.site_code())] {
                if value.chars().count() > MAX_FIELD_LENGTH {
                    problems.push(format!(
                        "{}: Ensure this value has at most {} characters.",
                        field, MAX_FIELD_LENGTH
                    ));
                }
            }
            for problem in problems {
                errors.push(format!(
                    "Error with location in sheet '{}', at row {}. {}",
                    l.location_type, l.index, problem
                ));
            }
        }
        errors
    }
}

/// Values occurring more than once, with their counts, in first-seen order.
/// Blank values never count.
fn duplicates<'s>(values: impl Iterator<Item = &'s str>) -> Vec<(&'s str, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values.filter(|v| !v.is_empty()) {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }
    order
        .into_iter()
        .filter_map(|v| counts.get(v).filter(|&&c| c > 1).map(|&c| (v, c)))
        .collect()
}
