#![allow(dead_code)]

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tmux_sessionizer::config::Config;
use tmux_sessionizer::tmux::{Multiplexer, WindowTarget};

/// Build a Config rooted in the temp dir.
pub fn test_config(tmp: &TempDir) -> Config {
    Config::new(tmp.path().join(".config").join("tmux-sessionizer"))
}

/// Create a fake git repository (a directory with an empty `.git/` dir) at `<tmp>/<rel>`.
pub fn init_fake_repo(tmp: &TempDir, rel: &str) -> PathBuf {
    let repo_path = tmp.path().join(rel);
    std::fs::create_dir_all(repo_path.join(".git")).unwrap();
    repo_path
}

/// Write raw contents to a file, creating parent directories.
pub fn write_file(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    NewSession {
        session: String,
        dir: PathBuf,
        first_window: String,
    },
    NewWindow {
        target: String,
        name: String,
        dir: PathBuf,
    },
    SendKeys {
        target: String,
        keys: Vec<String>,
    },
    SelectWindow {
        target: String,
    },
    KillSession {
        session: String,
    },
    Attach {
        session: String,
    },
}

/// In-memory multiplexer that records every call.
#[derive(Debug, Default)]
pub struct RecordingMux {
    pub existing: Vec<String>,
    pub calls: Vec<Call>,
    /// Fail the N-th mutating call (0-based), if set.
    pub fail_at: Option<usize>,
}

impl RecordingMux {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(name: &str) -> Self {
        Self {
            existing: vec![name.to_string()],
            ..Self::default()
        }
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    fn record(&mut self, call: Call) -> Result<()> {
        if self.fail_at == Some(self.calls.len()) {
            self.calls.push(call);
            anyhow::bail!("tmux exploded");
        }
        self.calls.push(call);
        Ok(())
    }
}

impl Multiplexer for RecordingMux {
    fn session_exists(&mut self, session_name: &str) -> bool {
        self.existing.iter().any(|s| s == session_name)
    }

    fn new_session(&mut self, session_name: &str, working_dir: &Path, first_window: &str) -> Result<()> {
        self.record(Call::NewSession {
            session: session_name.to_string(),
            dir: working_dir.to_path_buf(),
            first_window: first_window.to_string(),
        })?;
        self.existing.push(session_name.to_string());
        Ok(())
    }

    fn new_window(&mut self, target: &WindowTarget, name: &str, working_dir: &Path) -> Result<()> {
        self.record(Call::NewWindow {
            target: target.to_string(),
            name: name.to_string(),
            dir: working_dir.to_path_buf(),
        })
    }

    fn send_keys(&mut self, target: &WindowTarget, keys: &[&str]) -> Result<()> {
        self.record(Call::SendKeys {
            target: target.to_string(),
            keys: keys.iter().map(|k| k.to_string()).collect(),
        })
    }

    fn select_window(&mut self, target: &WindowTarget) -> Result<()> {
        self.record(Call::SelectWindow {
            target: target.to_string(),
        })
    }

    fn kill_session(&mut self, session_name: &str) -> Result<()> {
        self.record(Call::KillSession {
            session: session_name.to_string(),
        })?;
        self.existing.retain(|s| s != session_name);
        Ok(())
    }

    fn attach(&mut self, session_name: &str) -> Result<()> {
        self.record(Call::Attach {
            session: session_name.to_string(),
        })
    }
}
