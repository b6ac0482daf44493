use std::collections::HashMap;

pub mod config;
pub mod entry;
pub mod semester;
pub mod system;
pub mod transfer;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::ledger::SlotIndex;

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(semester::definitions());
    commands.extend(entry::definitions());
    commands.extend(transfer::definitions());
    commands.extend(config::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

/// Parses a one-based semester number.
pub(crate) fn parse_slot(raw: &str) -> Result<SlotIndex, CommandError> {
    let number: usize = raw.parse().map_err(|_| {
        CommandError::InvalidArguments(format!("semester must be a number from 1 to 8, got `{raw}`"))
    })?;
    Ok(SlotIndex::from_number(number)?)
}

/// Parses a one-based row number into a zero-based index.
pub(crate) fn parse_row(raw: &str) -> Result<usize, CommandError> {
    match raw.parse::<usize>() {
        Ok(row) if row >= 1 => Ok(row - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "row must be a positive number, got `{raw}`"
        ))),
    }
}

pub(crate) fn require_args<'a>(
    args: &'a [&'a str],
    count: usize,
    usage: &str,
) -> Result<&'a [&'a str], CommandError> {
    if args.len() < count {
        Err(CommandError::InvalidArguments(format!("usage: {usage}")))
    } else {
        Ok(args)
    }
}
