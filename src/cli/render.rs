//! Text rendering of semesters and statistics.

use colored::Colorize;

use crate::cli::output::{self, current_preferences};
use crate::ledger::{GpaBand, ModuleEntry, SemesterSlot, SlotIndex, Statistics};

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: &'static str,
    pub min_width: usize,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    const fn new(header: &'static str, alignment: Alignment) -> Self {
        Self {
            header,
            min_width: 0,
            max_width: None,
            alignment,
        }
    }
}

pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = column.header.chars().count().max(column.min_width);
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(cell.chars().count());
                    }
                }
                match column.max_width {
                    Some(max) => width.min(max),
                    None => width,
                }
            })
            .collect()
    }

    fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        self.columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (column, width))| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, *width, column.alignment)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let headers: Vec<String> = self.columns.iter().map(|c| c.header.to_string()).collect();
        let mut lines = vec![self.render_row(&headers, &widths), horizontal_rule(&widths)];
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines.join("\n")
    }
}

fn truncate_text(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

pub fn render_cell(text: &str, width: usize, alignment: Alignment) -> String {
    let fitted = truncate_text(text, width);
    let padding = width.saturating_sub(fitted.chars().count());
    match alignment {
        Alignment::Left => format!("{fitted}{}", " ".repeat(padding)),
        Alignment::Right => format!("{}{fitted}", " ".repeat(padding)),
    }
}

pub fn horizontal_rule(widths: &[usize]) -> String {
    let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    let ch = if current_preferences().plain_mode { '-' } else { '─' };
    ch.to_string().repeat(total)
}

const MODULE_NAME_MAX: usize = 32;

pub fn slot_table(slot: &SemesterSlot) -> Table {
    let mut module = TableColumn::new("Module", Alignment::Left);
    module.min_width = 12;
    module.max_width = Some(MODULE_NAME_MAX);
    Table {
        columns: vec![
            TableColumn::new("#", Alignment::Right),
            module,
            TableColumn::new("GPA", Alignment::Right),
            TableColumn::new("Credits", Alignment::Right),
            TableColumn::new("S/U", Alignment::Left),
            TableColumn::new("Id", Alignment::Right),
        ],
        rows: slot
            .iter()
            .enumerate()
            .map(|(index, entry)| entry_row(index, entry))
            .collect(),
    }
}

fn entry_row(index: usize, entry: &ModuleEntry) -> Vec<String> {
    let name = if entry.is_filled() {
        entry.name.clone()
    } else {
        "(unnamed)".to_string()
    };
    vec![
        (index + 1).to_string(),
        name,
        format!("{:.1}", entry.grade_point),
        entry.credits.to_string(),
        if entry.exempt { "yes" } else { "-" }.to_string(),
        entry.id.0.to_string(),
    ]
}

pub fn print_slot(slot: SlotIndex, entries: &SemesterSlot) {
    output::section(format!("{}. {}", slot.number(), slot.title()));
    if entries.is_empty() {
        output::info("  (no modules)");
    } else {
        println!("{}", slot_table(entries).render());
    }
}

pub fn statistics_line(stats: &Statistics) -> String {
    format!(
        "GPA: {:.2} | Total credits: {} | Graded credits: {} | S/U used: {}/{}",
        stats.gpa, stats.total_credits, stats.graded_credits, stats.su_count, stats.su_cap
    )
}

pub fn print_statistics(stats: &Statistics) {
    let line = statistics_line(stats);
    if current_preferences().plain_mode {
        println!("{line}");
    } else {
        let styled = match stats.band() {
            GpaBand::Low => line.bright_red(),
            GpaBand::Normal => line.bright_yellow(),
            GpaBand::High => line.bright_green(),
        };
        println!("{styled}");
    }
    if stats.at_cap {
        output::warning(format!(
            "S/U limit reached: {} of {} S/U modules used.",
            stats.su_count, stats.su_cap
        ));
    }
}
