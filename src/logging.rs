use anyhow::{Context, Result};
use std::path::Path;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use tmux_sessionizer::config::Config;

const MAX_LOG_LINES: usize = 1000;
const KEPT_LOG_LINES: usize = 750;

/// Rotate the log file if it exceeds 1000 lines.
/// Keeps the most recent 750 lines.
pub fn rotate_log(config: &Config) {
    let content = match std::fs::read_to_string(&config.log_path) {
        Ok(c) => c,
        Err(_) => return,
    };

    let lines: Vec<&str> = content.lines().collect();
    if lines.len() <= MAX_LOG_LINES {
        return;
    }

    let start = lines.len() - KEPT_LOG_LINES;
    let trimmed = lines[start..].join("\n");
    let _ = std::fs::write(&config.log_path, format!("{}\n", trimmed));
}

/// Set up file-based logging with tracing-subscriber.
///
/// Logs go to `~/.config/tmux-sessionizer/sessionizer.log`. Default level is
/// DEBUG for this crate and WARN for dependencies; `RUST_LOG` overrides it.
/// Nothing is written to stderr, so the picker and tmux attach stay clean.
pub fn setup_logging(config: &Config) -> Result<()> {
    config.ensure_dirs()?;

    let log_file = open_log_file(&config.log_path)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tmux_sessionizer=debug,warn"));

    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::debug!("Logging initialized, writing to {}", config.log_path.display());

    Ok(())
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}
