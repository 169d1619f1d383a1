use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tmux-sessionizer")]
#[command(about = "Pick a git repository and open a multi-window tmux session for it")]
#[command(version)]
pub struct Cli {
    /// Directory to search for git repositories (defaults to the current directory)
    pub dir: Option<PathBuf>,

    /// Attach to an existing session without prompting
    #[arg(short, long)]
    pub attach: bool,

    /// Kill and recreate an existing session without prompting
    #[arg(short, long)]
    pub kill: bool,

    /// Use the current directory for the session (skip repository selection)
    #[arg(short, long)]
    pub current: bool,

    /// Open the interactive window configuration editor
    #[arg(long)]
    pub config: bool,
}
