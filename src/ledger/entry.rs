use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

pub const MIN_GRADE_POINT: f64 = 0.0;
pub const MAX_GRADE_POINT: f64 = 5.0;
pub const GRADE_POINT_STEP: f64 = 0.5;
pub const MIN_CREDITS: u32 = 2;
pub const MAX_CREDITS: u32 = 8;
pub const DEFAULT_CREDITS: u32 = 4;
/// Highest id the counter may issue; the counter itself must still fit in a `u64`.
pub const MAX_ENTRY_ID: u64 = u64::MAX - 1;

/// Stable identifier handed out by the ledger's monotonic counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A grade point restricted to 0.0..=5.0 in half steps.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct GradePoint(f64);

impl GradePoint {
    pub fn new(value: f64) -> Result<Self> {
        if is_legal_grade_point(value) {
            Ok(Self(value))
        } else {
            Err(LedgerError::InvalidGradePoint(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// All eleven legal values in ascending order.
    pub fn all() -> impl Iterator<Item = GradePoint> {
        (0..=10).map(|step| GradePoint(f64::from(step) * GRADE_POINT_STEP))
    }
}

impl TryFrom<f64> for GradePoint {
    type Error = LedgerError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for GradePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// A credit weight restricted to 2..=8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Credits(u32);

impl Credits {
    pub fn new(value: i64) -> Result<Self> {
        if is_legal_credits(value) {
            Ok(Self(value as u32))
        } else {
            Err(LedgerError::InvalidCredits(value))
        }
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Credits {
    fn default() -> Self {
        Self(DEFAULT_CREDITS)
    }
}

impl TryFrom<i64> for Credits {
    type Error = LedgerError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn is_legal_grade_point(value: f64) -> bool {
    if !value.is_finite() || !(MIN_GRADE_POINT..=MAX_GRADE_POINT).contains(&value) {
        return false;
    }
    let steps = value / GRADE_POINT_STEP;
    steps.fract() == 0.0
}

pub fn is_legal_credits(value: i64) -> bool {
    (i64::from(MIN_CREDITS)..=i64::from(MAX_CREDITS)).contains(&value)
}

/// One module row inside a semester.
///
/// Numeric fields are stored raw so that leniently imported documents can be
/// held unchanged; edits go through [`EntryUpdate`], whose payloads are
/// range-checked on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub id: EntryId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "gpa", default)]
    pub grade_point: f64,
    #[serde(default = "ModuleEntry::default_credits")]
    pub credits: u32,
    #[serde(rename = "su", default)]
    pub exempt: bool,
}

impl ModuleEntry {
    pub fn new(id: EntryId, credits: Credits) -> Self {
        Self {
            id,
            name: String::new(),
            grade_point: MIN_GRADE_POINT,
            credits: credits.value(),
            exempt: false,
        }
    }

    /// An entry counts towards statistics only once it has a name.
    pub fn is_filled(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn counts_as_su(&self) -> bool {
        self.exempt && self.is_filled()
    }

    pub fn default_credits() -> u32 {
        DEFAULT_CREDITS
    }
}

/// Typed single-field edit applied through `Ledger::update_entry`.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryUpdate {
    Name(String),
    GradePoint(GradePoint),
    Credits(Credits),
    Exempt(bool),
}

impl EntryUpdate {
    pub fn field(&self) -> &'static str {
        match self {
            EntryUpdate::Name(_) => "name",
            EntryUpdate::GradePoint(_) => "gpa",
            EntryUpdate::Credits(_) => "credits",
            EntryUpdate::Exempt(_) => "su",
        }
    }
}
