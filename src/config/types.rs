//! Configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::entities::LocationDataModel;

/// Defaults for import runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Tenant used when `--tenant` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    #[serde(default)]
    pub dry_run: bool,
}

/// Where the tree store lives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store file; defaults to `<data dir>/locsync/tree.toml`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Custom-data fields defined for the tenant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataModelConfig {
    #[serde(default)]
    pub fields: Vec<String>,
    /// Fields every row with custom data must fill in
    #[serde(default)]
    pub required: Vec<String>,
}

impl DataModelConfig {
    pub fn to_model(&self) -> LocationDataModel {
        LocationDataModel::new(self.fields.iter().cloned())
            .with_required(self.required.iter().cloned())
    }
}

/// Verbosity level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl Verbosity {
    /// Default `tracing` filter directive for this level
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::Debug => "debug",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub verbosity: Verbosity,
    /// Emit NDJSON events instead of a text report
    #[serde(default)]
    pub json: bool,
}

/// Full configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub data_model: DataModelConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Store path, falling back to the user data directory
    pub fn store_path(&self) -> PathBuf {
        self.store.path.clone().unwrap_or_else(default_store_path)
    }
}

pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("locsync")
        .join("tree.toml")
}
