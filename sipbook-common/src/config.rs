//! Configuration loading and root folder resolution
//!
//! Values resolve in priority order:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default
//!
//! A missing or unreadable TOML file is never fatal: it is logged and the
//! defaults are used.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::lookup::local::DatasetResource;
use crate::lookup::remote::DEFAULT_BASE_URL;
use crate::{Error, Result};

pub const ROOT_FOLDER_ENV: &str = "SIPBOOK_ROOT_FOLDER";
pub const API_KEY_ENV: &str = "SIPBOOK_API_NINJAS_KEY";
pub const DATABASE_FILE: &str = "sipbook.db";

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub api_ninjas_key: Option<String>,
    pub api_base_url: Option<String>,
    /// Mocktail dataset file; the bundled copy when unset
    pub mocktail_dataset: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn dataset_resource(&self) -> DatasetResource {
        match &self.mocktail_dataset {
            Some(path) => DatasetResource::File(path.clone()),
            None => DatasetResource::Bundled,
        }
    }
}

/// Parse a config file strictly; errors on missing or malformed files
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load `path` (or the platform default location), falling back to defaults
pub fn load_toml_config(path: Option<&Path>) -> TomlConfig {
    let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => path,
        None => {
            warn!("Could not determine config directory, using defaults");
            return TomlConfig::default();
        }
    };

    if !path.exists() {
        info!("No config file at {}, using defaults", path.display());
        return TomlConfig::default();
    }

    match read_toml_config(&path) {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Ignoring config file {}: {}", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// Write config atomically: temp file in the same directory, then rename
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// `<config dir>/sipbook/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sipbook").join("config.toml"))
}

/// Platform defaults used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let root_folder = dirs::data_local_dir()
            .map(|d| d.join("sipbook"))
            .unwrap_or_else(|| PathBuf::from("./sipbook_data"));
        Self {
            root_folder,
            log_level: default_log_level(),
        }
    }
}

/// Resolves the root folder holding the database
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_value: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>, config: &TomlConfig) -> Self {
        Self {
            cli_arg,
            toml_value: config.root_folder.clone(),
        }
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = non_blank_path(self.cli_arg.as_ref()) {
            return path;
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = non_blank_path(self.toml_value.as_ref()) {
            return path;
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

fn non_blank_path(path: Option<&PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty()).cloned()
}

/// Prepares the root folder and names the files inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn database_path(&self) -> PathBuf {
        self.root.join(DATABASE_FILE)
    }

    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }

    /// Idempotent
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root)?;
            info!("Created root folder: {}", self.root.display());
        }
        Ok(())
    }
}

/// API key: CLI → environment → TOML. `None` means lookups of cocktails
/// will fail with a missing-credential error.
pub fn resolve_api_key(cli_arg: Option<&str>, config: &TomlConfig) -> Option<String> {
    let env_key = std::env::var(API_KEY_ENV).ok();
    let candidates = [
        ("command line", cli_arg.map(str::to_string)),
        ("environment", env_key),
        ("TOML", config.api_ninjas_key.clone()),
    ];

    let mut valid = candidates
        .into_iter()
        .filter_map(|(source, key)| key.filter(|k| is_valid_key(k)).map(|k| (source, k)));

    match valid.next() {
        Some((source, key)) => {
            info!("API Ninjas key loaded from {}", source);
            Some(key.trim().to_string())
        }
        None => {
            warn!("API Ninjas key not configured; cocktail lookups will fail (set {})", API_KEY_ENV);
            None
        }
    }
}

/// Non-empty, non-whitespace
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
