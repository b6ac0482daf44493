//! Semester ledger: module entries, the eight fixed slots, and GPA statistics.

pub mod entry;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod slot;
pub mod stats;

pub use entry::{
    Credits, EntryId, EntryUpdate, GradePoint, ModuleEntry, DEFAULT_CREDITS, MAX_CREDITS,
    MAX_ENTRY_ID, MAX_GRADE_POINT, MIN_CREDITS, MIN_GRADE_POINT,
};
pub use ledger::{EntryPosition, Ledger, LedgerSettings, DEFAULT_SU_CAP};
pub use slot::{SemesterSlot, SlotIndex, SLOT_COUNT};
pub use stats::{GpaBand, Statistics};
