//! Import Options

use crate::domain::entities::LocationDataModel;

/// Options for the import use case
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Tenant whose tree is reconciled
    pub tenant: String,
    /// Validate and plan, but don't write
    pub dry_run: bool,
    /// Custom-data fields the tenant has defined
    pub data_model: LocationDataModel,
}

impl ImportOptions {
    pub fn new(tenant: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            ..Self::default()
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_data_model(mut self, data_model: LocationDataModel) -> Self {
        self.data_model = data_model;
        self
    }
}
