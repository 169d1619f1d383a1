use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::picker::ListOption;

pub struct Git;

impl Git {
    /// A repository root is a directory containing a `.git` directory.
    pub fn is_repo(dir: &Path) -> bool {
        dir.join(".git").is_dir()
    }

    /// Find repository roots under `root`.
    ///
    /// Hidden directories are skipped, and the walk never descends into a
    /// repository once found (the root included). Permission errors below the
    /// root are logged and skipped; anything else is returned.
    pub fn find_repos(root: &Path) -> Result<Vec<PathBuf>> {
        tracing::debug!(root = %root.display(), "searching for git repositories");
        let mut repos = Vec::new();

        let mut walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let permission_denied = err
                        .io_error()
                        .map(|e| e.kind() == ErrorKind::PermissionDenied)
                        .unwrap_or(false);
                    if permission_denied && err.depth() > 0 {
                        tracing::warn!(path = ?err.path(), "permission denied, skipping");
                        continue;
                    }
                    return Err(err).with_context(|| {
                        format!("Failed to search {} for git repositories", root.display())
                    });
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            if Self::is_repo(entry.path()) {
                repos.push(entry.path().to_path_buf());
                walker.skip_current_dir();
            }
        }

        tracing::debug!(root = %root.display(), count = repos.len(), "repository search finished");
        Ok(repos)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// Directory base name, used as the picker label and the session name.
pub fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Picker entries for repositories: base name as label, full path as value,
/// sorted case-insensitively by label.
///
/// With `mark_configured`, repos that have a local config get a ` [configured]` suffix.
pub fn repo_options(repos: &[PathBuf], mark_configured: bool) -> Vec<ListOption> {
    let mut options: Vec<ListOption> = repos
        .iter()
        .map(|path| {
            let mut label = dir_name(path);
            if mark_configured && Config::repo_config_path(path).exists() {
                label.push_str(" [configured]");
            }
            ListOption::new(label, path.to_string_lossy())
        })
        .collect();
    options.sort_by_key(|opt| opt.label.to_lowercase());
    options
}
