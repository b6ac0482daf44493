use crate::cli::commands::{parse_row, parse_slot, require_args, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::ledger::{Credits, EntryUpdate, GradePoint};

const ADD_USAGE: &str = "add <semester> [name] [gpa] [credits]";
const SET_USAGE: &str = "set <semester> <row> <name|gpa|credits|su> <value>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "add",
            "Add a module row to a semester",
            ADD_USAGE,
            cmd_add,
        ),
        CommandDefinition::new("set", "Change one field of a module", SET_USAGE, cmd_set),
        CommandDefinition::new(
            "su",
            "Toggle S/U for a module",
            "su <semester> <row>",
            cmd_su,
        ),
        CommandDefinition::new(
            "delete",
            "Delete a module row",
            "delete <semester> <row>",
            cmd_delete,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 1, ADD_USAGE)?;
    let slot = parse_slot(args[0])?;

    // Parse everything before touching the ledger so a bad value adds nothing.
    let mut updates = Vec::new();
    if let Some(name) = args.get(1) {
        updates.push(EntryUpdate::Name((*name).to_string()));
    }
    if let Some(raw) = args.get(2) {
        updates.push(EntryUpdate::GradePoint(parse_grade_point(raw)?));
    }
    if let Some(raw) = args.get(3) {
        updates.push(EntryUpdate::Credits(parse_credits(raw)?));
    }

    let id = context.ledger.add_entry(slot)?;
    let position = context.ledger.position_of(id)?;
    for update in updates {
        context
            .ledger
            .update_entry(position.slot, position.index, update)?;
    }
    io::print_success(format!(
        "Added row {} to {}.",
        position.index + 1,
        slot.title()
    ));
    context.refresh(slot);
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 4, SET_USAGE)?;
    let slot = parse_slot(args[0])?;
    let row = parse_row(args[1])?;
    let value = args[3..].join(" ");
    let update = match args[2].to_ascii_lowercase().as_str() {
        "name" => EntryUpdate::Name(value),
        "gpa" | "grade" => EntryUpdate::GradePoint(parse_grade_point(&value)?),
        "credits" | "mc" => EntryUpdate::Credits(parse_credits(&value)?),
        "su" => EntryUpdate::Exempt(parse_switch(&value)?),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown field `{other}`. Available: name, gpa, credits, su"
            )))
        }
    };
    context.ledger.update_entry(slot, row, update)?;
    context.refresh(slot);
    Ok(())
}

fn cmd_su(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 2, "su <semester> <row>")?;
    let slot = parse_slot(args[0])?;
    let row = parse_row(args[1])?;
    let exempt = context.ledger.toggle_exempt(slot, row)?;
    io::print_success(format!(
        "Row {} of {} is now {}.",
        row + 1,
        slot.title(),
        if exempt { "S/U" } else { "graded" }
    ));
    context.refresh(slot);
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 2, "delete <semester> <row>")?;
    let slot = parse_slot(args[0])?;
    let row = parse_row(args[1])?;
    let removed = context.ledger.delete_entry(slot, row)?;
    let label = if removed.is_filled() {
        removed.name.trim().to_string()
    } else {
        "unnamed module".to_string()
    };
    io::print_success(format!("Deleted {label} from {}.", slot.title()));
    context.refresh(slot);
    Ok(())
}

fn parse_grade_point(raw: &str) -> Result<GradePoint, CommandError> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        CommandError::InvalidArguments(format!("grade point must be a number, got `{raw}`"))
    })?;
    Ok(GradePoint::new(value)?)
}

fn parse_credits(raw: &str) -> Result<Credits, CommandError> {
    let value: i64 = raw.trim().parse().map_err(|_| {
        CommandError::InvalidArguments(format!("credits must be a whole number, got `{raw}`"))
    })?;
    Ok(Credits::new(value)?)
}

fn parse_switch(raw: &str) -> Result<bool, CommandError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Ok(true),
        "off" | "no" | "false" | "0" => Ok(false),
        _ => Err(CommandError::InvalidArguments(format!(
            "expected on/off, got `{raw}`"
        ))),
    }
}
