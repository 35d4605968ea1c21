//! Shell context, dispatch and error types for the CLI.

use std::{env, io, path::PathBuf};

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;

use splitledger_config::{Config, ConfigError, ConfigManager};
use splitledger_core::{CoreError, SettlementOptions};
use splitledger_domain::{GroupSnapshot, MemberId};

pub use crate::errors::CliError;
use crate::{errors::SnapshotError, utils::persistence};

use super::commands;
use super::output::{self, OutputPreferences};
use super::registry::CommandRegistry;

/// Overrides the base directory holding `config/config.json`.
pub const HOME_ENV: &str = "SPLITLEDGER_HOME";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub snapshot: Option<GroupSnapshot>,
    pub snapshot_path: Option<PathBuf>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = config_manager_from_env()?;
        let config = config_manager.load()?;
        apply_config(&config);

        let mut app = ShellContext {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            snapshot: None,
            snapshot_path: None,
            running: true,
        };
        app.auto_load_last();
        Ok(app)
    }

    fn auto_load_last(&mut self) {
        if self.mode != CliMode::Interactive {
            return;
        }
        let Some(path) = self.config.last_opened_snapshot.clone() else {
            return;
        };
        if let Ok(snapshot) = persistence::load_snapshot_from_file(&path) {
            output::success(format!("Automatically loaded `{}`.", path.display()));
            self.set_snapshot(snapshot, Some(path));
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        match &self.snapshot_path {
            Some(path) => {
                let name = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or("snapshot");
                format!("splitledger({name})> ")
            }
            None if self.snapshot.is_some() => "splitledger(unsaved)> ".to_string(),
            None => "splitledger> ".to_string(),
        }
    }

    /// Options for balance and settlement runs, derived from the config.
    pub fn settlement_options(&self) -> SettlementOptions {
        SettlementOptions {
            tolerance: self.config.tolerance(),
            dangling: self.config.dangling_references,
            strict: self.config.strict_validation,
        }
    }

    pub(crate) fn set_snapshot(&mut self, snapshot: GroupSnapshot, path: Option<PathBuf>) {
        for warning in splitledger_core::snapshot_warnings(&snapshot) {
            output::warning(warning);
        }
        self.snapshot = Some(snapshot);
        self.snapshot_path = path;
    }

    pub(crate) fn snapshot(&self) -> Result<&GroupSnapshot, CommandError> {
        self.snapshot.as_ref().ok_or(CommandError::SnapshotNotLoaded)
    }

    pub(crate) fn snapshot_mut(&mut self) -> Result<&mut GroupSnapshot, CommandError> {
        self.snapshot.as_mut().ok_or(CommandError::SnapshotNotLoaded)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn update_last_opened(&mut self, path: Option<PathBuf>) -> CommandResult {
        self.config.last_opened_snapshot = path;
        self.persist_config()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("Exit shell?")
            .default(true)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::SnapshotNotLoaded => {
                output::error("No snapshot loaded.");
                output::hint("Try `load <path>` or `new` to get started.");
                Ok(())
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }
}

fn config_manager_from_env() -> Result<ConfigManager, ConfigError> {
    match env::var_os(HOME_ENV) {
        Some(base) => ConfigManager::with_base_dir(PathBuf::from(base)),
        None => ConfigManager::default_location(),
    }
}

pub(crate) fn apply_config(config: &Config) {
    output::set_preferences(OutputPreferences {
        color_enabled: config.ui_color_enabled,
    });
    if !config.ui_color_enabled {
        colored::control::set_override(false);
    }
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

pub(crate) fn parse_member_id(input: &str) -> Result<MemberId, CommandError> {
    input
        .trim()
        .trim_start_matches('#')
        .parse::<i64>()
        .map(MemberId)
        .map_err(|_| CommandError::InvalidArguments(format!("invalid member id `{}`", input)))
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No snapshot loaded. Use `load <path>` or `new` first.")]
    SnapshotNotLoaded,
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}
