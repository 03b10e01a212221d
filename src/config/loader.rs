//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use super::types::{Config, Verbosity};

/// Project config file name, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "locsync.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

pub fn load(path: &Path) -> Result<Config, ConfigError> {
    load_with_warnings(path).map(|(config, _)| config)
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from project config, user config, or defaults, then apply env overrides
pub fn load_or_default(project_root: Option<&Path>) -> (Config, Vec<ConfigWarning>) {
    let candidates = project_root
        .map(|root| root.join(PROJECT_CONFIG_FILE))
        .into_iter()
        .chain(user_config_path());

    for candidate in candidates {
        if !candidate.exists() {
            continue;
        }
        match load_with_warnings(&candidate) {
            Ok((config, warnings)) => return (with_env_overrides(config), warnings),
            Err(err) => tracing::warn!(error = %err, "ignoring unreadable config"),
        }
    }

    (with_env_overrides(Config::default()), Vec::new())
}

/// `<config dir>/locsync/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("locsync").join("config.toml"))
}

/// Apply environment variable overrides (LOCSYNC_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_env(config, |key| std::env::var(key).ok())
}

pub(crate) fn apply_env(mut config: Config, var: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(tenant) = var("LOCSYNC_TENANT").filter(|t| !t.trim().is_empty()) {
        config.import.tenant = Some(tenant.trim().to_string());
    }

    if let Some(path) = var("LOCSYNC_STORE").filter(|p| !p.trim().is_empty()) {
        config.store.path = Some(PathBuf::from(path.trim()));
    }

    // LOCSYNC_DATA_FIELDS (comma-separated)
    if let Some(fields) = var("LOCSYNC_DATA_FIELDS") {
        config.data_model.fields = fields
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Some(verbosity) = var("LOCSYNC_VERBOSITY") {
        config.output.verbosity = match verbosity.to_lowercase().as_str() {
            "quiet" => Verbosity::Quiet,
            "verbose" => Verbosity::Verbose,
            "debug" => Verbosity::Debug,
            _ => Verbosity::Normal,
        };
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "import",
        "tenant",
        "dry_run",
        "store",
        "path",
        "data_model",
        "fields",
        "required",
        "output",
        "verbosity",
        "json",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
