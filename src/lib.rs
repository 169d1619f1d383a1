pub mod config;
pub mod git;
pub mod picker;
pub mod session;
pub mod tmux;
pub mod use_cases;
pub mod windows;
