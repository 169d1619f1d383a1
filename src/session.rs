use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::tmux::{self, Multiplexer, WindowTarget};
use crate::windows::{WindowLayout, WindowSpec};

/// Desired state of one tmux session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSpec {
    pub session_name: String,
    pub working_directory: PathBuf,
    pub windows: Vec<WindowSpec>,
    pub initial_active_window: usize,
}

impl SessionSpec {
    /// Build a spec, clamping an out-of-range initial window to 0.
    pub fn new(
        session_name: &str,
        working_directory: PathBuf,
        windows: Vec<WindowSpec>,
        initial_active_window: usize,
    ) -> Self {
        let initial_active_window = if initial_active_window < windows.len() {
            initial_active_window
        } else {
            0
        };
        Self {
            session_name: session_name.to_string(),
            working_directory,
            windows,
            initial_active_window,
        }
    }

    pub fn from_layout(session_name: &str, working_directory: PathBuf, layout: WindowLayout) -> Self {
        Self::new(
            session_name,
            working_directory,
            layout.windows,
            layout.initial_active_window,
        )
    }
}

/// How to handle a session that already exists, as requested on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExistsPolicy {
    pub force_attach: bool,
    pub force_recreate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictDecision {
    Attach,
    KillAndRecreate,
    Cancel,
}

/// Accepted answers to the conflict prompt (compared lowercased and trimmed).
const CONFLICT_CHOICES: &[(&str, ConflictDecision)] = &[
    ("a", ConflictDecision::Attach),
    ("y", ConflictDecision::Attach),
    ("k", ConflictDecision::KillAndRecreate),
    ("n", ConflictDecision::KillAndRecreate),
    ("q", ConflictDecision::Cancel),
    ("c", ConflictDecision::Cancel),
    ("", ConflictDecision::Cancel),
];

/// Map a prompt answer to a decision. `None` means the answer was not recognised.
pub fn parse_conflict_choice(input: &str) -> Option<ConflictDecision> {
    let input = input.trim().to_lowercase();
    CONFLICT_CHOICES
        .iter()
        .find(|(answer, _)| *answer == input)
        .map(|(_, decision)| *decision)
}

/// Ask the user what to do about an existing session. Reads exactly one line.
pub fn prompt_conflict<R: BufRead, W: Write>(
    session_name: &str,
    input: &mut R,
    output: &mut W,
) -> Result<ConflictDecision> {
    writeln!(output, "Session '{}' already exists. Choose an option:", session_name)?;
    writeln!(output, "[a/y] Attach")?;
    writeln!(output, "[k/n] Kill and recreate")?;
    writeln!(output, "[q/c] Cancel")?;
    output.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read answer from stdin")?;

    match parse_conflict_choice(&line) {
        Some(decision) => Ok(decision),
        None => {
            writeln!(output, "Invalid option, canceling operation")?;
            Ok(ConflictDecision::Cancel)
        }
    }
}

/// Decide without prompting when a flag forces the answer. Attach wins over recreate.
pub fn forced_decision(policy: ExistsPolicy) -> Option<ConflictDecision> {
    if policy.force_attach {
        Some(ConflictDecision::Attach)
    } else if policy.force_recreate {
        Some(ConflictDecision::KillAndRecreate)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Attached to a session that already existed.
    Attached,
    /// Built the session (possibly after killing the old one) and attached.
    Created,
    /// The user declined; nothing was changed.
    Cancelled,
}

impl std::fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileOutcome::Attached => write!(f, "attached"),
            ReconcileOutcome::Created => write!(f, "created"),
            ReconcileOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Bring the multiplexer to the state described by `spec` and attach to it.
///
/// An existing session is attached to, killed and rebuilt, or left alone,
/// depending on `policy` or the user's answer read from `input`. Any
/// multiplexer failure aborts immediately; windows created so far are left
/// in place.
pub fn reconcile<M, R, W>(
    mux: &mut M,
    spec: SessionSpec,
    policy: ExistsPolicy,
    input: &mut R,
    output: &mut W,
) -> Result<ReconcileOutcome>
where
    M: Multiplexer + ?Sized,
    R: BufRead,
    W: Write,
{
    let name = spec.session_name.as_str();

    if mux.session_exists(name) {
        let decision = match forced_decision(policy) {
            Some(decision) => decision,
            None => prompt_conflict(name, input, output)?,
        };
        tracing::debug!(session = name, decision = ?decision, "session already exists");

        match decision {
            ConflictDecision::Attach => {
                mux.attach(name)?;
                return Ok(ReconcileOutcome::Attached);
            }
            ConflictDecision::Cancel => return Ok(ReconcileOutcome::Cancelled),
            ConflictDecision::KillAndRecreate => mux.kill_session(name)?,
        }
    }

    build_session(mux, &spec)?;

    mux.select_window(&WindowTarget::new(name, spec.initial_active_window))?;
    mux.attach(name)?;
    Ok(ReconcileOutcome::Created)
}

/// Create the session and all its windows, typing each startup command.
fn build_session<M: Multiplexer + ?Sized>(mux: &mut M, spec: &SessionSpec) -> Result<()> {
    let name = spec.session_name.as_str();
    let dir = spec.working_directory.as_path();
    let (first, rest) = spec
        .windows
        .split_first()
        .context("Session has no windows configured")?;

    mux.new_session(name, dir, &first.name)?;
    send_startup_command(mux, &WindowTarget::new(name, 0), first)?;

    for (offset, window) in rest.iter().enumerate() {
        let target = WindowTarget::new(name, offset + 1);
        mux.new_window(&target, &window.name, dir)?;
        send_startup_command(mux, &target, window)?;
    }

    tracing::debug!(session = name, windows = spec.windows.len(), "session built");
    Ok(())
}

fn send_startup_command<M: Multiplexer + ?Sized>(
    mux: &mut M,
    target: &WindowTarget,
    window: &WindowSpec,
) -> Result<()> {
    match window.startup_command.as_deref() {
        Some(command) if !command.trim().is_empty() => {
            mux.send_keys(target, &tmux::command_keys(command))
        }
        _ => Ok(()),
    }
}
