use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::parse::DEFAULT_MAX_INCLUDE_DEPTH;
use crate::postprocess::DEFAULT_ROOT;

/// Settings for one run of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,
    #[serde(default)]
    pub anonymize: bool,
    #[serde(default)]
    pub remove_wildcards: bool,
    #[serde(default = "default_true")]
    pub add_root: bool,
    #[serde(default = "default_root_name")]
    pub root_name: String,
    #[serde(default)]
    pub detect_cycles: bool,
    #[serde(default = "default_max_include_depth")]
    pub max_include_depth: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
            anonymize: false,
            remove_wildcards: false,
            add_root: default_true(),
            root_name: default_root_name(),
            detect_cycles: false,
            max_include_depth: default_max_include_depth(),
        }
    }
}

/// `~/.config/hopmap/config.toml`: run defaults plus an output preference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(flatten)]
    pub run: RunConfig,
}

/// Load a user config file; a missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_file(path: &Path) -> Result<UserConfig> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load `<config_dir>/hopmap/config.toml`.
///
/// # Errors
///
/// See [`load_config_file`].
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };
    load_config_file(&config_dir.join("hopmap/config.toml"))
}

fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".ssh")
        .join("config")
}

const fn default_true() -> bool {
    true
}

fn default_root_name() -> String {
    DEFAULT_ROOT.to_string()
}

const fn default_max_include_depth() -> usize {
    DEFAULT_MAX_INCLUDE_DEPTH
}
