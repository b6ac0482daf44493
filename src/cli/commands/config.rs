use crate::cli::commands::{require_args, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::config::CONFIG_KEYS;

const USAGE: &str = "config [show] | config set <key> <value>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "Show or change preferences",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        None | Some("show") => show(context),
        Some("set") => {
            let args = require_args(args, 3, USAGE)?;
            set(context, args[1], &args[2..].join(" "))
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}`. Available: show, set"
        ))),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    let config = &context.config;
    output_section("Configuration");
    io::print_info(format!("  su_cap          : {}", config.su_cap));
    io::print_info(format!("  default_credits : {}", config.default_credits));
    io::print_info(format!("  import_mode     : {}", config.import_mode));
    io::print_info(format!("  export_path     : {}", config.export_path));
    io::print_info(format!(
        "  plain_output    : {}",
        if config.plain_output { "on" } else { "off" }
    ));
    io::print_info(format!(
        "  file            : {}",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn set(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let key = key.to_ascii_lowercase();
    if !CONFIG_KEYS.contains(&key.as_str()) {
        return Err(CommandError::InvalidArguments(format!(
            "unknown config key `{key}`. Available: {}",
            CONFIG_KEYS.join(", ")
        )));
    }
    let mut updated = context.config.clone();
    updated.set(&key, value)?;
    context.config_manager.save(&updated)?;
    context.config = updated;
    context
        .ledger
        .apply_settings(context.config.ledger_settings());
    io::apply_config(&context.config, context.mode);
    io::print_success(format!("Configuration updated ({key})."));
    Ok(())
}
