use std::path::{Path, PathBuf};

use crate::config::{self, Config, ConfigFile};

/// One window of a session: its name and the command typed into it on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    pub name: String,
    pub startup_command: Option<String>,
}

impl WindowSpec {
    pub fn new(name: &str, startup_command: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            startup_command: startup_command
                .filter(|c| !c.trim().is_empty())
                .map(str::to_string),
        }
    }
}

/// Which configuration layer a layout was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutSource {
    Repo,
    Global,
    Default,
}

impl std::fmt::Display for LayoutSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutSource::Repo => write!(f, "repo"),
            LayoutSource::Global => write!(f, "global"),
            LayoutSource::Default => write!(f, "default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowLayout {
    pub windows: Vec<WindowSpec>,
    pub initial_active_window: usize,
    pub source: LayoutSource,
}

impl WindowLayout {
    fn from_file(file: &ConfigFile, source: LayoutSource) -> Self {
        Self {
            windows: file
                .windows
                .iter()
                .map(|w| WindowSpec::new(&w.name, Some(&w.command)))
                .collect(),
            initial_active_window: file.initial_window_index(),
            source,
        }
    }
}

/// Config layers in priority order. The default layer is implicit and always last.
fn layer_paths(config: &Config, repo: Option<&Path>) -> Vec<(PathBuf, LayoutSource)> {
    let mut layers = Vec::with_capacity(2);
    if let Some(repo) = repo {
        layers.push((Config::repo_config_path(repo), LayoutSource::Repo));
    }
    layers.push((config.global_config_path.clone(), LayoutSource::Global));
    layers
}

/// First usable config document for `repo` (repo-local, then global), or the default.
/// Never fails: unusable layers are skipped.
pub fn effective_config_file(config: &Config, repo: Option<&Path>) -> (ConfigFile, LayoutSource) {
    layer_paths(config, repo)
        .into_iter()
        .find_map(|(path, source)| config::load_valid_config_file(&path).map(|f| (f, source)))
        .unwrap_or_else(|| (ConfigFile::default(), LayoutSource::Default))
}

/// Resolve the windows to create for a session rooted at `repo`.
pub fn resolve(config: &Config, repo: &Path) -> WindowLayout {
    let (file, source) = effective_config_file(config, Some(repo));
    let layout = WindowLayout::from_file(&file, source);
    tracing::debug!(
        repo = %repo.display(),
        source = %layout.source,
        windows = layout.windows.len(),
        initial = layout.initial_active_window,
        "resolved window layout"
    );
    layout
}
