//! Shell context, dispatch and error reporting.

use std::io;

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::{Config, ConfigError, ConfigManager},
    errors::LedgerError,
    ledger::{Ledger, SlotIndex},
};

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::io as cli_io;
use super::render;

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

/// Failures that abort the shell itself.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
}

/// Failures of a single command; reported and the loop continues.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub ledger: Ledger,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::from_default_location()?;
        Self::with_config_manager(mode, config_manager)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        cli_io::apply_config(&config, mode);
        let ledger = Ledger::with_settings(config.ledger_settings());
        Ok(Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            ledger,
            config,
            config_manager,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        })
    }

    pub fn prompt(&self) -> String {
        let stats = self.ledger.statistics();
        format!("gpa [{:.2}]> ", stats.gpa)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(definition) = self.registry.get(command) {
            let handler = definition.handler;
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
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(|err| match err {
            CommandError::Prompt(err) => CliError::Prompt(err),
            CommandError::Io(err) => CliError::Io(err),
            other => CliError::Io(io::Error::new(io::ErrorKind::Other, other.to_string())),
        })
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_info("Use `help <command>` for usage details.");
            }
            CommandError::Ledger(err @ LedgerError::SuCapReached { .. }) => {
                cli_io::print_warning(err);
            }
            CommandError::Ledger(LedgerError::ImportRejected(violations)) => {
                cli_io::print_error(format!(
                    "Import rejected; the current ledger was kept ({} problem(s)):",
                    violations.len()
                ));
                for violation in violations {
                    cli_io::print_info(format!("  - {violation}"));
                }
            }
            other => cli_io::print_error(other),
        }
    }

    /// Re-renders one semester and the statistics after a mutation.
    pub(crate) fn refresh(&self, slot: SlotIndex) {
        render::print_slot(slot, self.ledger.slot(slot));
        render::print_statistics(&self.ledger.statistics());
    }

    pub(crate) fn refresh_all(&self) {
        for (slot, entries) in self.ledger.slots() {
            render::print_slot(slot, entries);
        }
        render::print_statistics(&self.ledger.statistics());
    }
}
