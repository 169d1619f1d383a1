use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;
use std::process::Command;

/// A window inside a session, addressed by index (`session:index`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowTarget {
    pub session: String,
    pub index: usize,
}

impl WindowTarget {
    pub fn new(session: &str, index: usize) -> Self {
        Self {
            session: session.to_string(),
            index,
        }
    }
}

impl fmt::Display for WindowTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.session, self.index)
    }
}

/// The session/window operations the reconciler drives.
pub trait Multiplexer {
    fn session_exists(&mut self, session_name: &str) -> bool;

    /// Create a detached session whose first window is `first_window`.
    fn new_session(&mut self, session_name: &str, working_dir: &Path, first_window: &str)
        -> Result<()>;

    fn new_window(&mut self, target: &WindowTarget, name: &str, working_dir: &Path) -> Result<()>;

    /// Send each argument to tmux `send-keys`. See `command_keys`.
    fn send_keys(&mut self, target: &WindowTarget, keys: &[&str]) -> Result<()>;

    fn select_window(&mut self, target: &WindowTarget) -> Result<()>;

    fn kill_session(&mut self, session_name: &str) -> Result<()>;

    /// Hand the user's terminal over to the session. Blocks until detach.
    fn attach(&mut self, session_name: &str) -> Result<()>;
}

pub struct Tmux;

impl Tmux {
    /// Run a tmux command, turning a non-zero exit into an error carrying tmux's stderr.
    fn run(cmd: &mut Command, what: &str) -> Result<()> {
        let output = cmd
            .output()
            .with_context(|| format!("Failed to {}", what))?;

        if !output.status.success() {
            anyhow::bail!(
                "Failed to {}: {}",
                what,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(())
    }
}

impl Multiplexer for Tmux {
    fn session_exists(&mut self, session_name: &str) -> bool {
        // `=` forces an exact match instead of tmux's prefix matching
        Command::new("tmux")
            .args(["has-session", "-t", &format!("={}", session_name)])
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn new_session(
        &mut self,
        session_name: &str,
        working_dir: &Path,
        first_window: &str,
    ) -> Result<()> {
        tracing::debug!(session = session_name, dir = %working_dir.display(), window = first_window, "creating tmux session");
        Self::run(
            Command::new("tmux")
                .args(["new-session", "-d", "-s", session_name, "-c"])
                .arg(working_dir)
                .args(["-n", first_window]),
            "create tmux session",
        )
    }

    fn new_window(&mut self, target: &WindowTarget, name: &str, working_dir: &Path) -> Result<()> {
        tracing::debug!(window_target = %target, window = name, "creating tmux window");
        Self::run(
            Command::new("tmux")
                .args(["new-window", "-t", &target.to_string(), "-n", name, "-c"])
                .arg(working_dir),
            &format!("create window {}", name),
        )
    }

    fn send_keys(&mut self, target: &WindowTarget, keys: &[&str]) -> Result<()> {
        tracing::trace!(window_target = %target, keys = ?keys, "sending keys to tmux window");
        Self::run(
            Command::new("tmux")
                .args(["send-keys", "-t", &target.to_string()])
                .args(keys),
            &format!("send keys to {}", target),
        )
    }

    fn select_window(&mut self, target: &WindowTarget) -> Result<()> {
        tracing::debug!(window_target = %target, "selecting tmux window");
        Self::run(
            Command::new("tmux").args(["select-window", "-t", &target.to_string()]),
            "select initial window",
        )
    }

    fn kill_session(&mut self, session_name: &str) -> Result<()> {
        tracing::debug!(session = session_name, "killing tmux session");
        Self::run(
            Command::new("tmux").args(["kill-session", "-t", &format!("={}", session_name)]),
            "kill existing session",
        )
    }

    fn attach(&mut self, session_name: &str) -> Result<()> {
        tracing::debug!(session = session_name, "attaching to tmux session");
        let target = format!("={}", session_name);

        // Nested attach is refused by tmux, so switch the current client instead
        let subcommand = if std::env::var_os("TMUX").is_some() {
            "switch-client"
        } else {
            "attach-session"
        };

        let status = Command::new("tmux")
            .args([subcommand, "-t", &target])
            .status()
            .context("Failed to attach to tmux session")?;

        if !status.success() {
            anyhow::bail!("Failed to attach to tmux session '{}'", session_name);
        }

        Ok(())
    }
}

/// Turn a startup command into send-keys arguments, ending with `Enter`.
///
/// The command is split on whitespace with no shell quoting, so runs of
/// whitespace (including inside quotes) collapse to a single space. tmux
/// types each argument without separators, so words are deliberately
/// interleaved with the `Space` key name rather than passed bare: bare words
/// would reach the shell as one run-together token. A word that happens to
/// be a tmux key name (`Enter`, `Up`, `C-c`) is sent as that key.
pub fn command_keys(command: &str) -> Vec<&str> {
    let mut keys = Vec::new();
    for (i, word) in command.split_whitespace().enumerate() {
        if i > 0 {
            keys.push("Space");
        }
        keys.push(word);
    }
    keys.push("Enter");
    keys
}
