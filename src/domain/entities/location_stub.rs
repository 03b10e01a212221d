//! LocationStub - one row of a per-type locations sheet
//!
//! A stub carries two identity keys: the stable `location_id` and the
//! human-assigned `site_code`. At least one must be present; the other is
//! filled in from the existing state by [`LocationStub::autoset_identity`].

use std::collections::BTreeMap;

use crate::domain::entities::LocationCollection;
use crate::domain::value_objects::{Row, TreeRef, CUSTOM_DATA_PREFIX, UNCATEGORIZED_DATA_PREFIX};

/// Header names of a locations sheet
pub struct LocationSheetHeaders;

impl LocationSheetHeaders {
    pub const LOCATION_ID: &'static str = "location_id";
    pub const SITE_CODE: &'static str = "site_code";
    pub const NAME: &'static str = "name";
    pub const PARENT_SITE_CODE: &'static str = "parent_site_code";
    pub const EXTERNAL_ID: &'static str = "external_id";
    pub const LATITUDE: &'static str = "latitude";
    pub const LONGITUDE: &'static str = "longitude";
    pub const DO_DELETE: &'static str = "do_delete";
    pub const DELETE_UNCATEGORIZED_DATA: &'static str = "delete_uncategorized_data";

    /// Headers every locations sheet must carry
    pub const REQUIRED: [&'static str; 8] = [
        Self::LOCATION_ID,
        Self::SITE_CODE,
        Self::NAME,
        Self::PARENT_SITE_CODE,
        Self::EXTERNAL_ID,
        Self::LATITUDE,
        Self::LONGITUDE,
        Self::DO_DELETE,
    ];

    /// Whether a header is allowed without being required
    pub fn is_optional(header: &str) -> bool {
        header == Self::DELETE_UNCATEGORIZED_DATA
            || header.starts_with(CUSTOM_DATA_PREFIX)
            || header.starts_with(UNCATEGORIZED_DATA_PREFIX)
    }
}

/// A row that cannot be turned into a usable stub
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowFormatError {
    #[error("Location in sheet '{sheet}', at row '{index}' doesn't contain either location_id or site_code")]
    MissingIdentity { sheet: String, index: usize },

    #[error(
        "Location in sheet '{sheet}', at row '{index}' has no site_code and its location_id '{location_id}' is not found in your domain"
    )]
    UnresolvableIdentity {
        sheet: String,
        index: usize,
        location_id: String,
    },
}

/// A proposed location, as listed in the upload
#[derive(Debug, Clone, PartialEq)]
pub struct LocationStub {
    pub name: String,
    /// Lower-cased; `None` until resolved when only `location_id` was given
    pub site_code: Option<String>,
    /// Code of the owning type (the sheet title)
    pub location_type: String,
    /// Parent site code (lower-cased) or root
    pub parent_code: TreeRef,
    pub location_id: Option<String>,
    pub external_id: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    /// `None` when the sheet has no custom-data columns
    pub custom_data: Option<BTreeMap<String, String>>,
    pub delete_uncategorized_data: bool,
    pub do_delete: bool,
    /// Set by identity resolution: describes a location to create
    pub is_new: bool,
    /// Row position in the sheet, for messages
    pub index: usize,
}

impl LocationStub {
    /// Build a stub from its core fields. Blank strings count as absent.
    pub fn new(
        name: impl Into<String>,
        site_code: &str,
        location_type: impl Into<String>,
        parent_code: &str,
        location_id: &str,
        index: usize,
    ) -> Result<Self, RowFormatError> {
        let stub = Self {
            name: name.into(),
            site_code: normalize_site_code(Some(site_code)),
            location_type: location_type.into(),
            parent_code: TreeRef::from_code(Some(parent_code)).to_lowercase(),
            location_id: non_blank(location_id),
            external_id: None,
            latitude: None,
            longitude: None,
            custom_data: None,
            delete_uncategorized_data: false,
            do_delete: false,
            is_new: false,
            index,
        };
        stub.check_identity()?;
        Ok(stub)
    }

    /// Parse a locations-sheet row belonging to `owning_type`
    pub fn from_row(row: &Row, index: usize, owning_type: &str) -> Result<Self, RowFormatError> {
        let custom_data = if row.has_prefixed(CUSTOM_DATA_PREFIX)
            || row.has_prefixed(UNCATEGORIZED_DATA_PREFIX)
        {
            let mut data = row.prefixed(UNCATEGORIZED_DATA_PREFIX);
            data.extend(row.prefixed(CUSTOM_DATA_PREFIX));
            Some(data)
        } else {
            None
        };

        let stub = Self {
            name: row
                .get_string(LocationSheetHeaders::NAME)
                .unwrap_or_default(),
            site_code: normalize_site_code(row.get(LocationSheetHeaders::SITE_CODE)),
            location_type: owning_type.to_string(),
            parent_code: TreeRef::from_code(row.get(LocationSheetHeaders::PARENT_SITE_CODE))
                .to_lowercase(),
            location_id: row.get_string(LocationSheetHeaders::LOCATION_ID),
            external_id: row.get_string(LocationSheetHeaders::EXTERNAL_ID),
            latitude: row.get_string(LocationSheetHeaders::LATITUDE),
            longitude: row.get_string(LocationSheetHeaders::LONGITUDE),
            custom_data,
            delete_uncategorized_data: row.flag(LocationSheetHeaders::DELETE_UNCATEGORIZED_DATA),
            do_delete: row.flag(LocationSheetHeaders::DO_DELETE),
            is_new: false,
            index,
        };
        stub.check_identity()?;
        Ok(stub)
    }

    pub fn with_external_id(mut self, external_id: &str) -> Self {
        self.external_id = non_blank(external_id);
        self
    }

    pub fn with_coordinates(mut self, latitude: &str, longitude: &str) -> Self {
        self.latitude = non_blank(latitude);
        self.longitude = non_blank(longitude);
        self
    }

    pub fn with_custom_data(mut self, data: BTreeMap<String, String>) -> Self {
        self.custom_data = Some(data);
        self
    }

    pub fn marked_for_delete(mut self) -> Self {
        self.do_delete = true;
        self
    }

    /// Resolved site code ("" only before identity resolution)
    pub fn site_code(&self) -> &str {
        self.site_code.as_deref().unwrap_or_default()
    }

    pub fn has_identity(&self) -> bool {
        self.site_code.is_some() || self.location_id.is_some()
    }

    fn check_identity(&self) -> Result<(), RowFormatError> {
        if self.has_identity() {
            Ok(())
        } else {
            Err(RowFormatError::MissingIdentity {
                sheet: self.location_type.clone(),
                index: self.index,
            })
        }
    }

    /// Fill in whichever identity key is missing from the existing state.
    ///
    /// - Both keys present: nothing to do.
    /// - Only `location_id`: it must match an existing location, whose site
    ///   code is adopted.
    /// - Only `site_code`: if it matches an existing location, that location's
    ///   id is adopted; otherwise the stub describes a new location.
    ///
    /// `existing` is `None` for a tenant with no prior state.
    pub fn autoset_identity(
        &mut self,
        existing: Option<&LocationCollection>,
    ) -> Result<(), RowFormatError> {
        match (&self.location_id, &self.site_code) {
            (Some(_), Some(_)) => Ok(()),
            (None, None) => Err(RowFormatError::MissingIdentity {
                sheet: self.location_type.clone(),
                index: self.index,
            }),
            (Some(location_id), None) => {
                let found = existing.and_then(|c| c.location_by_id(location_id));
                match found {
                    Some(record) => {
                        self.site_code = Some(record.site_code.to_lowercase());
                        Ok(())
                    }
                    None => Err(RowFormatError::UnresolvableIdentity {
                        sheet: self.location_type.clone(),
                        index: self.index,
                        location_id: location_id.clone(),
                    }),
                }
            }
            (None, Some(site_code)) => {
                match existing.and_then(|c| c.location_by_site_code(site_code)) {
                    Some(record) => self.location_id = Some(record.location_id.clone()),
                    None => self.is_new = true,
                }
                Ok(())
            }
        }
    }

    /// Latitude and longitude as numbers; `Err` names the bad value
    pub fn coordinates(&self) -> Result<(Option<f64>, Option<f64>), String> {
        let parse = |raw: &Option<String>| -> Result<Option<f64>, String> {
            match raw {
                None => Ok(None),
                Some(value) => value
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(Some)
                    .ok_or_else(|| value.clone()),
            }
        };
        Ok((parse(&self.latitude)?, parse(&self.longitude)?))
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn normalize_site_code(raw: Option<&str>) -> Option<String> {
    raw.and_then(non_blank).map(|s| s.to_lowercase())
}
