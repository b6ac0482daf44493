use crate::cli::commands::{parse_slot, require_args, CommandDefinition};
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::{io, render};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "show",
            "Show all semesters or a single one",
            "show [semester]",
            cmd_show,
        ),
        CommandDefinition::new("stats", "Show GPA and credit totals", "stats", cmd_stats),
        CommandDefinition::new(
            "reset-sem",
            "Remove every module from one semester",
            "reset-sem <semester>",
            cmd_reset_sem,
        ),
        CommandDefinition::new(
            "reset",
            "Clear all semesters and restart entry ids",
            "reset",
            cmd_reset,
        ),
    ]
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        Some(raw) => {
            let slot = parse_slot(raw)?;
            context.refresh(slot);
        }
        None => context.refresh_all(),
    }
    Ok(())
}

fn cmd_stats(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    render::print_statistics(&context.ledger.statistics());
    Ok(())
}

fn cmd_reset_sem(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 1, "reset-sem <semester>")?;
    let slot = parse_slot(args[0])?;
    context.ledger.reset_slot(slot);
    io::print_success(format!("Cleared {}.", slot.title()));
    context.refresh(slot);
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm("Clear every semester?")? {
        io::print_info("Reset cancelled.");
        return Ok(());
    }
    context.ledger.reset();
    io::print_success("All semesters cleared.");
    render::print_statistics(&context.ledger.statistics());
    Ok(())
}
