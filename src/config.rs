use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Current on-disk schema version written by `save_config_file`.
pub const CONFIG_VERSION: &str = "1.0";

/// File name of the repo-local config, stored inside the repo's `.git/` directory.
const REPO_CONFIG_FILE: &str = "tmux-sessionizer.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: PathBuf,
    pub global_config_path: PathBuf,
    pub log_path: PathBuf,
}

impl Config {
    pub fn new(base_dir: PathBuf) -> Self {
        let global_config_path = base_dir.join("config.json");
        let log_path = base_dir.join("sessionizer.log");

        Self {
            base_dir,
            global_config_path,
            log_path,
        }
    }

    pub fn load() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Could not find home directory")?;
        let config = Self::new(home_dir.join(".config").join("tmux-sessionizer"));
        tracing::debug!(base_dir = %config.base_dir.display(), "config loaded");
        Ok(config)
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.base_dir).context("Failed to create config directory")?;
        Ok(())
    }

    /// Get repo-local config path: <repo>/.git/tmux-sessionizer.json
    pub fn repo_config_path(repo: &Path) -> PathBuf {
        repo.join(".git").join(REPO_CONFIG_FILE)
    }
}

/// Reasons a config document is rejected even though it parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config must have at least one window")]
    NoWindows,
    #[error("window {index} has an empty name")]
    EmptyWindowName { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub command: String,
}

/// `"command": null` means no command.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl WindowConfig {
    pub fn new(name: &str, command: &str) -> Self {
        Self {
            name: name.to_string(),
            command: command.to_string(),
        }
    }
}

/// On-disk config document, shared by the global and repo-local layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default = "default_version")]
    pub version: String,
    pub windows: Vec<WindowConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_active_window: Option<i64>,
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

impl Default for ConfigFile {
    /// Built-in layout used when neither config layer is usable.
    fn default() -> Self {
        Self {
            version: default_version(),
            windows: vec![
                WindowConfig::new("nvim", "nvim"),
                WindowConfig::new("server", ""),
                WindowConfig::new("term", ""),
            ],
            initial_active_window: Some(0),
        }
    }
}

impl ConfigFile {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.windows.is_empty() {
            return Err(ConfigError::NoWindows);
        }
        if let Some(index) = self.windows.iter().position(|w| w.name.is_empty()) {
            return Err(ConfigError::EmptyWindowName { index });
        }
        Ok(())
    }

    /// Initial active window as an index into `windows`; anything out of range maps to 0.
    pub fn initial_window_index(&self) -> usize {
        match self.initial_active_window {
            Some(i) if i >= 0 && (i as usize) < self.windows.len() => i as usize,
            _ => 0,
        }
    }
}

/// Read, parse and validate a config file.
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let file: ConfigFile = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    file.validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(file)
}

/// Lenient variant of `load_config_file`: any failure means "not usable".
pub fn load_valid_config_file(path: &Path) -> Option<ConfigFile> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not present");
        return None;
    }
    match load_config_file(path) {
        Ok(file) => Some(file),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %format!("{e:#}"), "ignoring unusable config file");
            None
        }
    }
}

/// Validate and atomically write a config file (temp file in the same dir, then rename).
pub fn save_config_file(path: &Path, file: &ConfigFile) -> Result<()> {
    file.validate().context("Refusing to save invalid config")?;

    let dir = path
        .parent()
        .with_context(|| format!("Config path has no parent directory: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let contents = serde_json::to_string_pretty(file).context("Failed to serialize config")?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .context("Failed to write config")?;
    tmp.write_all(b"\n").context("Failed to write config")?;
    tmp.persist(path)
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    tracing::debug!(path = %path.display(), windows = file.windows.len(), "config saved");
    Ok(())
}
