//! Configuration module
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (LOCSYNC_*)
//! 3. Project config (./locsync.toml) or `--config`
//! 4. User config (<config dir>/locsync/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{
    load, load_or_default, load_with_warnings, user_config_path, with_env_overrides, ConfigError,
    ConfigWarning, PROJECT_CONFIG_FILE,
};
pub use types::{
    default_store_path, Config, DataModelConfig, ImportConfig, OutputConfig, StoreConfig,
    Verbosity,
};
