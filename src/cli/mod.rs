pub mod commands;
pub mod core;
pub mod help;
pub mod output;
pub mod registry;
mod shell;

pub use self::core::{CliMode, CommandError, ShellContext};
pub use shell::{run_cli, SCRIPT_ENV};
