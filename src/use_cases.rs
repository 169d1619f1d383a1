use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Component, Path, PathBuf};
use std::process::Command;

use crate::config::{self, Config, ConfigFile};
use crate::git::{self, Git};
use crate::session::{self, ExistsPolicy, ReconcileOutcome, SessionSpec};
use crate::tmux::Multiplexer;
use crate::windows;

/// Required external tools that must be on $PATH.
const REQUIRED_TOOLS: &[&str] = &["tmux"];

/// Check that all required external tools are present on $PATH.
/// Returns a list of missing tool names (empty if all present).
pub fn check_dependencies() -> Vec<String> {
    let mut missing = Vec::new();
    for &tool in REQUIRED_TOOLS {
        let found = Command::new("which")
            .arg(tool)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false);
        if !found {
            missing.push(tool.to_string());
        }
    }
    missing
}

/// Return an install hint for a missing tool.
pub fn install_hint(tool: &str) -> &'static str {
    match tool {
        "tmux" => "brew install tmux (macOS) / apt install tmux (Linux)",
        _ => "(see tool documentation)",
    }
}

/// Session name for a directory: its base name, with `.` and `:` replaced by `_`.
/// tmux rewrites those characters itself, which would break exact-name lookups.
pub fn session_name_for(dir: &Path) -> String {
    git::dir_name(dir).replace(['.', ':'], "_")
}

/// Make `dir` absolute against the current directory and clean it lexically
/// (without touching the filesystem).
pub fn absolute_dir(dir: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(match dir {
        Some(d) if d.is_absolute() => normalize_path(d),
        Some(d) => normalize_path(&cwd.join(d)),
        None => cwd,
    })
}

/// Drop `.` components and resolve `..` against the preceding component.
/// `..` at the root stays at the root; leading `..` in a relative path is kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Resolve the window layout for `dir` and reconcile its tmux session.
pub fn open_session<M, R, W>(
    config: &Config,
    mux: &mut M,
    dir: &Path,
    policy: ExistsPolicy,
    input: &mut R,
    output: &mut W,
) -> Result<ReconcileOutcome>
where
    M: Multiplexer + ?Sized,
    R: BufRead,
    W: Write,
{
    let session_name = session_name_for(dir);
    let layout = windows::resolve(config, dir);
    let spec = SessionSpec::from_layout(&session_name, dir.to_path_buf(), layout);

    tracing::debug!(session = %session_name, dir = %dir.display(), ?policy, "opening session");
    let outcome = session::reconcile(mux, spec, policy, input, output)?;
    tracing::debug!(session = %session_name, %outcome, "session reconciled");
    Ok(outcome)
}

/// What the config editor should edit: the target file and its starting content.
#[derive(Debug, Clone)]
pub struct EditTarget {
    pub path: PathBuf,
    pub initial: ConfigFile,
    /// Display label, e.g. "global" or the repo name.
    pub label: String,
}

/// Global config, seeded from the current global file or the default.
pub fn global_edit_target(config: &Config) -> EditTarget {
    let (initial, _) = windows::effective_config_file(config, None);
    EditTarget {
        path: config.global_config_path.clone(),
        initial,
        label: "global".to_string(),
    }
}

/// Repo-local config for `repo`, seeded from its own file, else global, else the default.
pub fn repo_edit_target(config: &Config, repo: &Path) -> Result<EditTarget> {
    if !Git::is_repo(repo) {
        anyhow::bail!(
            "{} is not a git repository (repo-level config requires one; use --config without -c for the global config)",
            repo.display()
        );
    }
    let (initial, source) = windows::effective_config_file(config, Some(repo));
    tracing::debug!(repo = %repo.display(), %source, "editing repo config");
    Ok(EditTarget {
        path: Config::repo_config_path(repo),
        initial,
        label: git::dir_name(repo),
    })
}

/// Save edited config to its target.
pub fn save_edit(target: &EditTarget, file: &ConfigFile) -> Result<()> {
    config::save_config_file(&target.path, file)
}

