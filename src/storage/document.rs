use std::{array, collections::HashSet, fmt};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    errors::{ImportViolation, LedgerError, Result},
    ledger::{
        entry::{is_legal_credits, is_legal_grade_point},
        EntryId, Ledger, LedgerSettings, ModuleEntry, SemesterSlot, DEFAULT_CREDITS, MAX_ENTRY_ID,
        SLOT_COUNT,
    },
};

/// How strictly an imported document is checked before it replaces the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Slot count, entry shape, value ranges, id uniqueness and the S/U cap
    /// must all hold; every violation is reported together.
    #[default]
    Strict,
    /// Only the top-level array is required. Anything the typed ledger can
    /// hold is accepted and the oddities are returned as warnings.
    Lenient,
}

impl ImportMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(ImportMode::Strict),
            "lenient" => Some(ImportMode::Lenient),
            _ => None,
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportMode::Strict => f.write_str("strict"),
            ImportMode::Lenient => f.write_str("lenient"),
        }
    }
}

/// Outcome of a successful import.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub ledger: Ledger,
    pub warnings: Vec<String>,
}

/// Serializes the eight slots as a pretty-printed array of arrays.
pub fn export_document(ledger: &Ledger) -> Result<String> {
    let json = serde_json::to_string_pretty(ledger.raw_slots())?;
    info!(entries = ledger.entry_count(), "exported ledger document");
    Ok(json)
}

pub fn parse_document(input: &str, mode: ImportMode, settings: LedgerSettings) -> Result<ImportReport> {
    let value: Value = serde_json::from_str(input)?;
    decode_document(value, mode, settings)
}

/// Replaces `ledger` with the decoded document. On any error the ledger is
/// left exactly as it was.
pub fn import_into(ledger: &mut Ledger, input: &str, mode: ImportMode) -> Result<Vec<String>> {
    let report = parse_document(input, mode, ledger.settings())?;
    *ledger = report.ledger;
    info!(
        %mode,
        entries = ledger.entry_count(),
        warnings = report.warnings.len(),
        "imported ledger document"
    );
    Ok(report.warnings)
}

pub fn decode_document(value: Value, mode: ImportMode, settings: LedgerSettings) -> Result<ImportReport> {
    let slots = match value {
        Value::Array(slots) => slots,
        other => {
            return Err(LedgerError::InvalidImportFormat(format!(
                "expected an array of semesters, found {}",
                describe(&other)
            )))
        }
    };
    match mode {
        ImportMode::Strict => decode_strict(slots, settings),
        ImportMode::Lenient => decode_lenient(slots, settings),
    }
}

#[derive(Deserialize)]
struct StrictEntry {
    id: u64,
    name: String,
    gpa: f64,
    credits: i64,
    su: bool,
}

fn decode_strict(slots: Vec<Value>, settings: LedgerSettings) -> Result<ImportReport> {
    let mut violations = Vec::new();
    if slots.len() != SLOT_COUNT {
        violations.push(ImportViolation::SlotCount { found: slots.len() });
    }

    let mut seen = HashSet::new();
    let mut decoded = Vec::with_capacity(slots.len());
    for (slot, value) in slots.into_iter().enumerate() {
        let Value::Array(items) = value else {
            violations.push(ImportViolation::SlotNotArray { slot });
            continue;
        };
        let mut entries = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let raw: StrictEntry = match serde_json::from_value(item) {
                Ok(raw) => raw,
                Err(err) => {
                    violations.push(ImportViolation::MalformedEntry {
                        slot,
                        index,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            if raw.id > MAX_ENTRY_ID {
                violations.push(ImportViolation::IdOutOfRange { id: raw.id });
            }
            if !seen.insert(raw.id) {
                violations.push(ImportViolation::DuplicateId { id: raw.id });
            }
            if !is_legal_grade_point(raw.gpa) {
                violations.push(ImportViolation::GradePointOutOfRange {
                    id: raw.id,
                    value: raw.gpa,
                });
            }
            if !is_legal_credits(raw.credits) {
                violations.push(ImportViolation::CreditsOutOfRange {
                    id: raw.id,
                    value: raw.credits,
                });
                continue;
            }
            entries.push(ModuleEntry {
                id: EntryId(raw.id),
                name: raw.name,
                grade_point: raw.gpa,
                credits: raw.credits as u32,
                exempt: raw.su,
            });
        }
        decoded.push(SemesterSlot::from_entries(entries));
    }

    let su_count = count_su(&decoded);
    if su_count > settings.su_cap {
        violations.push(ImportViolation::SuCapExceeded {
            count: su_count,
            cap: settings.su_cap,
        });
    }

    if !violations.is_empty() {
        warn!(violations = violations.len(), "rejected import");
        return Err(LedgerError::ImportRejected(violations));
    }

    Ok(ImportReport {
        ledger: Ledger::from_slots(into_fixed(decoded), settings),
        warnings: Vec::new(),
    })
}

#[derive(Deserialize)]
struct LenientEntry {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    gpa: Option<f64>,
    #[serde(default)]
    credits: Option<u32>,
    #[serde(default)]
    su: Option<bool>,
}

fn decode_lenient(slots: Vec<Value>, settings: LedgerSettings) -> Result<ImportReport> {
    let mut warnings = Vec::new();
    match slots.len() {
        n if n < SLOT_COUNT => warnings.push(format!(
            "document has {n} semesters; padded to {SLOT_COUNT} with empty semesters"
        )),
        n if n > SLOT_COUNT => warnings.push(format!(
            "document has {n} semesters; semesters after {SLOT_COUNT} were dropped"
        )),
        _ => {}
    }

    let mut decoded = Vec::with_capacity(SLOT_COUNT);
    let mut missing_ids = Vec::new();
    for (slot, value) in slots.into_iter().take(SLOT_COUNT).enumerate() {
        let Value::Array(items) = value else {
            return Err(LedgerError::InvalidImportFormat(format!(
                "semester {} is not a list of modules",
                slot + 1
            )));
        };
        let mut entries = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let raw: LenientEntry = serde_json::from_value(item).map_err(|err| {
                LedgerError::InvalidImportFormat(format!(
                    "semester {} row {}: {err}",
                    slot + 1,
                    index + 1
                ))
            })?;
            match raw.id {
                None => missing_ids.push((slot, index)),
                Some(id) if id > MAX_ENTRY_ID => {
                    warnings.push(format!(
                        "entry id {id} is out of range; a fresh id will be assigned"
                    ));
                    missing_ids.push((slot, index));
                }
                Some(_) => {}
            }
            entries.push(ModuleEntry {
                id: EntryId(raw.id.filter(|id| *id <= MAX_ENTRY_ID).unwrap_or_default()),
                name: raw.name.unwrap_or_default(),
                grade_point: raw.gpa.unwrap_or_default(),
                credits: raw.credits.unwrap_or(DEFAULT_CREDITS),
                exempt: raw.su.unwrap_or_default(),
            });
        }
        decoded.push(entries);
    }

    assign_missing_ids(&mut decoded, &missing_ids, &mut warnings)?;

    let mut seen = HashSet::new();
    for entry in decoded.iter().flatten() {
        if !seen.insert(entry.id) {
            warnings.push(format!("entry id {} appears more than once", entry.id.0));
        }
        if !is_legal_grade_point(entry.grade_point) {
            warnings.push(format!(
                "entry {} has illegal grade point {}",
                entry.id.0, entry.grade_point
            ));
        }
        if !is_legal_credits(i64::from(entry.credits)) {
            warnings.push(format!(
                "entry {} has illegal credits {}",
                entry.id.0, entry.credits
            ));
        }
    }

    let slots: Vec<SemesterSlot> = decoded.into_iter().map(SemesterSlot::from_entries).collect();
    let su_count = count_su(&slots);
    if su_count > settings.su_cap {
        warnings.push(format!(
            "{su_count} S/U modules exceed the cap of {}",
            settings.su_cap
        ));
    }

    for warning in &warnings {
        warn!("lenient import: {warning}");
    }

    Ok(ImportReport {
        ledger: Ledger::from_slots(into_fixed(slots), settings),
        warnings,
    })
}

fn assign_missing_ids(
    decoded: &mut [Vec<ModuleEntry>],
    missing: &[(usize, usize)],
    warnings: &mut Vec<String>,
) -> Result<()> {
    if missing.is_empty() {
        return Ok(());
    }
    let missing_set: HashSet<_> = missing.iter().copied().collect();
    let mut next = decoded
        .iter()
        .enumerate()
        .flat_map(|(slot, entries)| {
            entries
                .iter()
                .enumerate()
                .map(move |(index, entry)| ((slot, index), entry.id.0))
        })
        .filter(|(pos, _)| !missing_set.contains(pos))
        .map(|(_, id)| id + 1)
        .max()
        .unwrap_or(0);
    for &(slot, index) in missing {
        if next > MAX_ENTRY_ID {
            return Err(LedgerError::InvalidImportFormat(
                "no entry ids left to assign to entries without one".into(),
            ));
        }
        decoded[slot][index].id = EntryId(next);
        next += 1;
    }
    warnings.push(format!("assigned fresh ids to {} entries without one", missing.len()));
    Ok(())
}

fn count_su(slots: &[SemesterSlot]) -> usize {
    slots
        .iter()
        .flat_map(SemesterSlot::iter)
        .filter(|entry| entry.counts_as_su())
        .count()
}

fn into_fixed(mut slots: Vec<SemesterSlot>) -> [SemesterSlot; SLOT_COUNT] {
    slots.resize_with(SLOT_COUNT, SemesterSlot::new);
    let mut iter = slots.into_iter();
    array::from_fn(|_| iter.next().unwrap_or_default())
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
