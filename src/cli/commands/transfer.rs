use std::path::PathBuf;

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::storage::{load_ledger_from_path, save_ledger_to_path, ImportMode};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "export",
            "Write all semesters to a JSON file",
            "export [path]",
            cmd_export,
        ),
        CommandDefinition::new(
            "import",
            "Replace all semesters with a JSON file",
            "import [path] [--strict|--lenient]",
            cmd_import,
        ),
    ]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = resolve_path(context, args.first().copied());
    save_ledger_to_path(&context.ledger, &path)?;
    io::print_success(format!(
        "Exported {} module(s) to {}.",
        context.ledger.entry_count(),
        path.display()
    ));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut mode = context.config.import_mode;
    let mut path_arg = None;
    for arg in args {
        match *arg {
            "--lenient" => mode = ImportMode::Lenient,
            "--strict" => mode = ImportMode::Strict,
            flag if flag.starts_with("--") => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown flag `{flag}`. Available: --strict, --lenient"
                )))
            }
            path if path_arg.is_none() => path_arg = Some(path),
            _ => {
                return Err(CommandError::InvalidArguments(
                    "usage: import [path] [--strict|--lenient]".into(),
                ))
            }
        }
    }

    let path = resolve_path(context, path_arg);
    let warnings = load_ledger_from_path(&mut context.ledger, &path, mode)?;
    io::print_success(format!(
        "Imported {} module(s) from {} ({mode} mode).",
        context.ledger.entry_count(),
        path.display()
    ));
    for warning in &warnings {
        io::print_warning(warning);
    }
    context.refresh_all();
    Ok(())
}

fn resolve_path(context: &ShellContext, arg: Option<&str>) -> PathBuf {
    PathBuf::from(arg.unwrap_or(context.config.export_path.as_str()))
}
