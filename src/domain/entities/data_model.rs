//! Custom location data model
//!
//! The set of custom-data fields a tenant has defined. Anything else found
//! in a location's metadata is "uncategorized". Required fields must carry a
//! non-blank value whenever a row provides custom data.

use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationDataModel {
    fields: BTreeSet<String>,
    required: BTreeSet<String>,
}

impl LocationDataModel {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            required: BTreeSet::new(),
        }
    }

    /// Mark fields as required; they become known fields too
    pub fn with_required<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields.into_iter().map(Into::into) {
            self.fields.insert(field.clone());
            self.required.insert(field);
        }
        self
    }

    pub fn is_known(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required.contains(field)
    }

    /// Problems with provided custom data, `None` when it is acceptable
    pub fn validate(&self, data: &BTreeMap<String, String>) -> Option<String> {
        let problems: Vec<String> = self
            .required
            .iter()
            .filter(|field| data.get(*field).map_or(true, |v| v.trim().is_empty()))
            .map(|field| format!("{} is required.", field))
            .collect();
        if problems.is_empty() {
            None
        } else {
            Some(problems.join(" "))
        }
    }

    /// Split metadata into (known fields, uncategorized fields)
    pub fn split(
        &self,
        metadata: &BTreeMap<String, String>,
    ) -> (BTreeMap<String, String>, BTreeMap<String, String>) {
        metadata
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .partition(|(k, _)| self.is_known(k))
    }

    /// Compute the metadata a location ends up with.
    ///
    /// - `provided` is `None` when the upload has no custom-data columns; the
    ///   existing metadata is kept as-is.
    /// - With `delete_uncategorized`, only fields of the model survive.
    /// - Otherwise uncategorized fields of the existing record are carried
    ///   over underneath whatever was provided.
    pub fn merge(
        &self,
        existing: &BTreeMap<String, String>,
        provided: Option<&BTreeMap<String, String>>,
        delete_uncategorized: bool,
    ) -> BTreeMap<String, String> {
        let mut metadata = provided.cloned().unwrap_or_else(|| existing.clone());

        if delete_uncategorized {
            let (known, _) = self.split(&metadata);
            return known;
        }

        if provided.is_some() {
            let (_, unknown) = self.split(existing);
            for (key, value) in unknown {
                metadata.entry(key).or_insert(value);
            }
        }

        metadata
    }
}
