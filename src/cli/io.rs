use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::core::{CliMode, CommandError};
use crate::cli::output::{self, OutputPreferences};
use crate::config::Config;

pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

/// Script runs never colour their output so it stays greppable.
pub fn apply_config(config: &Config, mode: CliMode) {
    output::set_preferences(OutputPreferences {
        plain_mode: config.plain_output || mode == CliMode::Script,
    });
}

pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}
