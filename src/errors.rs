use std::fmt;

use thiserror::Error;

use crate::ledger::{EntryId, SlotIndex};

/// Error type that captures ledger, import and persistence failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Maximum of {cap} S/U modules allowed!")]
    SuCapReached { cap: usize },
    #[error("Invalid data format: {0}")]
    InvalidImportFormat(String),
    #[error("Import rejected with {} violation(s): {}", .0.len(), join_violations(.0))]
    ImportRejected(Vec<ImportViolation>),
    #[error("No entry at row {row} of {slot}", row = .index + 1)]
    EntryNotFound { slot: SlotIndex, index: usize },
    #[error("No entry ids left; reset or import a smaller ledger")]
    IdsExhausted,
    #[error("Unknown entry id {0}")]
    UnknownEntry(EntryId),
    #[error("Semester {0} does not exist (expected 1-8)")]
    SlotOutOfRange(usize),
    #[error("Grade point {0} must be between 0.0 and 5.0 in steps of 0.5")]
    InvalidGradePoint(f64),
    #[error("Credits {0} must be between 2 and 8")]
    InvalidCredits(i64),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// A single structural problem found while validating an imported document.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportViolation {
    SlotCount { found: usize },
    SlotNotArray { slot: usize },
    MalformedEntry { slot: usize, index: usize, reason: String },
    GradePointOutOfRange { id: u64, value: f64 },
    CreditsOutOfRange { id: u64, value: i64 },
    DuplicateId { id: u64 },
    IdOutOfRange { id: u64 },
    SuCapExceeded { count: usize, cap: usize },
}

impl fmt::Display for ImportViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportViolation::SlotCount { found } => {
                write!(f, "expected 8 semesters, found {found}")
            }
            ImportViolation::SlotNotArray { slot } => {
                write!(f, "semester {} is not a list of modules", slot + 1)
            }
            ImportViolation::MalformedEntry {
                slot,
                index,
                reason,
            } => write!(
                f,
                "semester {} row {} is malformed: {reason}",
                slot + 1,
                index + 1
            ),
            ImportViolation::GradePointOutOfRange { id, value } => {
                write!(f, "entry {id} has illegal grade point {value}")
            }
            ImportViolation::CreditsOutOfRange { id, value } => {
                write!(f, "entry {id} has illegal credits {value}")
            }
            ImportViolation::DuplicateId { id } => write!(f, "entry id {id} appears more than once"),
            ImportViolation::IdOutOfRange { id } => write!(f, "entry id {id} is out of range"),
            ImportViolation::SuCapExceeded { count, cap } => {
                write!(f, "{count} S/U modules exceed the cap of {cap}")
            }
        }
    }
}

fn join_violations(violations: &[ImportViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
