mod cli;
mod logging;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use cli::Cli;
use tmux_sessionizer::config::Config;
use tmux_sessionizer::git::{self, Git};
use tmux_sessionizer::picker::ListOption;
use tmux_sessionizer::session::{ExistsPolicy, ReconcileOutcome};
use tmux_sessionizer::tmux::Tmux;
use tmux_sessionizer::use_cases;

fn main() {
    // Setup better panic handling
    better_panic::install();

    if let Err(e) = run() {
        tracing::error!(error = %format!("{e:#}"), "exiting with error");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = Config::load()?;

    // Rotate log file before setting up logging (keeps it under 1000 lines)
    logging::rotate_log(&config);
    logging::setup_logging(&config)?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed arguments");

    if cli.config {
        return cmd_config(&config, &cli);
    }

    let missing = use_cases::check_dependencies();
    if !missing.is_empty() {
        let hints: Vec<String> = missing
            .iter()
            .map(|tool| format!("{} ({})", tool, use_cases::install_hint(tool)))
            .collect();
        anyhow::bail!("required tools are not installed: {}", hints.join(", "));
    }

    let policy = ExistsPolicy {
        force_attach: cli.attach,
        force_recreate: cli.kill,
    };

    let dir = if cli.current {
        use_cases::absolute_dir(None)?
    } else {
        match select_repo(cli.dir.as_deref(), false)? {
            Some(dir) => dir,
            None => return Ok(()),
        }
    };

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    let outcome = use_cases::open_session(&config, &mut Tmux, &dir, policy, &mut input, &mut output)
        .context("Error creating tmux session")?;

    if outcome == ReconcileOutcome::Cancelled {
        tracing::info!(dir = %dir.display(), "session open cancelled");
    }
    Ok(())
}

/// Discover repositories under `dir` and let the user pick one.
/// Returns `None` (after telling the user) when there is nothing to open.
fn select_repo(dir: Option<&Path>, mark_configured: bool) -> Result<Option<PathBuf>> {
    let search_dir = use_cases::absolute_dir(dir)?;
    println!("Searching for git repositories in: {}", search_dir.display());

    let repos = Git::find_repos(&search_dir).context("Error finding git repositories")?;
    if repos.is_empty() {
        println!("No git repositories found.");
        return Ok(None);
    }

    let options = git::repo_options(&repos, mark_configured);
    match tui::pick("Select a repository", options, true)? {
        Some(selected) => Ok(Some(PathBuf::from(selected.value))),
        None => {
            println!("No repository selected.");
            Ok(None)
        }
    }
}

const GLOBAL_CHOICE: &str = "global";
const REPO_CHOICE: &str = "repo";

fn cmd_config(config: &Config, cli: &Cli) -> Result<()> {
    let target = if cli.current {
        let cwd = use_cases::absolute_dir(None)?;
        use_cases::repo_edit_target(config, &cwd)?
    } else {
        let choices = vec![
            ListOption::new("Global configuration", GLOBAL_CHOICE),
            ListOption::new("Repo-level configuration", REPO_CHOICE),
        ];
        let Some(choice) = tui::pick("Choose configuration type", choices, false)? else {
            return Ok(());
        };

        if choice.value == GLOBAL_CHOICE {
            use_cases::global_edit_target(config)
        } else {
            match select_repo(cli.dir.as_deref(), true)? {
                Some(repo) => use_cases::repo_edit_target(config, &repo)?,
                None => return Ok(()),
            }
        }
    };

    let path = target.path.clone();
    if tui::run_editor(target)? {
        println!("Configuration saved to {}", path.display());
    }
    Ok(())
}
