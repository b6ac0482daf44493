use std::array;

use tracing::{debug, info, warn};

use crate::errors::{LedgerError, Result};

use super::{
    entry::{Credits, EntryId, EntryUpdate, ModuleEntry, MAX_ENTRY_ID},
    slot::{SemesterSlot, SlotIndex, SLOT_COUNT},
    stats::Statistics,
};

pub const DEFAULT_SU_CAP: usize = 8;

/// Tunables that the owning application may override from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSettings {
    pub su_cap: usize,
    pub default_credits: Credits,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            su_cap: DEFAULT_SU_CAP,
            default_credits: Credits::default(),
        }
    }
}

/// Current location of an entry. Positions shift on delete, so they must be
/// re-resolved after every mutating call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPosition {
    pub slot: SlotIndex,
    pub index: usize,
}

/// Eight semester slots plus the id counter and the S/U cap.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    slots: [SemesterSlot; SLOT_COUNT],
    next_id: u64,
    settings: LedgerSettings,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_settings(LedgerSettings::default())
    }

    pub fn with_settings(settings: LedgerSettings) -> Self {
        Self {
            slots: array::from_fn(|_| SemesterSlot::new()),
            next_id: 0,
            settings,
        }
    }

    /// Builds a ledger from already-decoded slots; the counter resumes after
    /// the highest id present.
    pub(crate) fn from_slots(slots: [SemesterSlot; SLOT_COUNT], settings: LedgerSettings) -> Self {
        let next_id = slots
            .iter()
            .flat_map(SemesterSlot::iter)
            .map(|entry| entry.id.0.min(MAX_ENTRY_ID) + 1)
            .max()
            .unwrap_or(0);
        Self {
            slots,
            next_id,
            settings,
        }
    }

    pub fn settings(&self) -> LedgerSettings {
        self.settings
    }

    /// Applies new settings. Lowering the cap below the current S/U count is
    /// allowed; further toggles are refused until the count drops again.
    pub fn apply_settings(&mut self, settings: LedgerSettings) {
        if settings.su_cap < self.su_count() {
            warn!(
                cap = settings.su_cap,
                su_count = self.su_count(),
                "S/U cap lowered below current usage"
            );
        }
        self.settings = settings;
    }

    pub fn su_cap(&self) -> usize {
        self.settings.su_cap
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn slot(&self, slot: SlotIndex) -> &SemesterSlot {
        &self.slots[slot.get()]
    }

    pub fn slots(&self) -> impl Iterator<Item = (SlotIndex, &SemesterSlot)> {
        SlotIndex::all().zip(self.slots.iter())
    }

    pub(crate) fn raw_slots(&self) -> &[SemesterSlot; SLOT_COUNT] {
        &self.slots
    }

    pub fn entry_count(&self) -> usize {
        self.slots.iter().map(SemesterSlot::len).sum()
    }

    pub fn entry(&self, slot: SlotIndex, index: usize) -> Result<&ModuleEntry> {
        self.slot(slot)
            .get(index)
            .ok_or(LedgerError::EntryNotFound { slot, index })
    }

    fn entry_mut(&mut self, slot: SlotIndex, index: usize) -> Result<&mut ModuleEntry> {
        self.slots[slot.get()]
            .get_mut(index)
            .ok_or(LedgerError::EntryNotFound { slot, index })
    }

    pub fn locate(&self, id: EntryId) -> Option<EntryPosition> {
        self.slots().find_map(|(slot, entries)| {
            entries
                .iter()
                .position(|entry| entry.id == id)
                .map(|index| EntryPosition { slot, index })
        })
    }

    pub fn entry_by_id(&self, id: EntryId) -> Option<&ModuleEntry> {
        self.locate(id)
            .and_then(|pos| self.slot(pos.slot).get(pos.index))
    }

    /// Like [`Ledger::locate`] but reports unknown ids as an error.
    pub fn position_of(&self, id: EntryId) -> Result<EntryPosition> {
        self.locate(id).ok_or(LedgerError::UnknownEntry(id))
    }

    /// Appends a blank entry. Fails only once every id up to
    /// [`MAX_ENTRY_ID`] has been handed out.
    pub fn add_entry(&mut self, slot: SlotIndex) -> Result<EntryId> {
        if self.next_id > MAX_ENTRY_ID {
            warn!(next_id = self.next_id, "entry ids exhausted");
            return Err(LedgerError::IdsExhausted);
        }
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.slots[slot.get()].push(ModuleEntry::new(id, self.settings.default_credits));
        debug!(%slot, %id, "added entry");
        Ok(id)
    }

    pub fn update_entry(
        &mut self,
        slot: SlotIndex,
        index: usize,
        update: EntryUpdate,
    ) -> Result<()> {
        let field = update.field();
        match update {
            EntryUpdate::Name(name) => {
                let entry = self.entry(slot, index)?;
                let becomes_filled = !entry.is_filled() && !name.trim().is_empty();
                if entry.exempt && becomes_filled {
                    self.ensure_su_available()?;
                }
                self.entry_mut(slot, index)?.name = name;
            }
            EntryUpdate::GradePoint(value) => {
                self.entry_mut(slot, index)?.grade_point = value.value();
            }
            EntryUpdate::Credits(value) => {
                self.entry_mut(slot, index)?.credits = value.value();
            }
            EntryUpdate::Exempt(exempt) => {
                let current = self.entry(slot, index)?.exempt;
                if exempt && !current {
                    self.ensure_su_available()?;
                }
                self.entry_mut(slot, index)?.exempt = exempt;
            }
        }
        debug!(%slot, row = index + 1, field, "updated entry");
        Ok(())
    }

    pub fn delete_entry(&mut self, slot: SlotIndex, index: usize) -> Result<ModuleEntry> {
        let removed = self.slots[slot.get()]
            .remove(index)
            .ok_or(LedgerError::EntryNotFound { slot, index })?;
        debug!(%slot, id = %removed.id, "deleted entry");
        Ok(removed)
    }

    /// Flips the S/U flag and returns the new value. Turning S/U on is refused
    /// once the cap is reached; turning it off always succeeds.
    pub fn toggle_exempt(&mut self, slot: SlotIndex, index: usize) -> Result<bool> {
        let currently = self.entry(slot, index)?.exempt;
        if !currently {
            self.ensure_su_available()?;
        }
        let entry = self.entry_mut(slot, index)?;
        entry.exempt = !currently;
        debug!(%slot, id = %entry.id, exempt = entry.exempt, "toggled S/U");
        Ok(entry.exempt)
    }

    fn ensure_su_available(&self) -> Result<()> {
        let count = self.su_count();
        if count >= self.settings.su_cap {
            warn!(count, cap = self.settings.su_cap, "S/U cap reached");
            return Err(LedgerError::SuCapReached {
                cap: self.settings.su_cap,
            });
        }
        Ok(())
    }

    pub fn reset_slot(&mut self, slot: SlotIndex) {
        self.slots[slot.get()].clear();
        info!(%slot, "semester reset");
    }

    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
        self.next_id = 0;
        info!("ledger reset");
    }

    /// Filled S/U entries, recomputed from current state.
    pub fn su_count(&self) -> usize {
        self.slots
            .iter()
            .flat_map(SemesterSlot::iter)
            .filter(|entry| entry.counts_as_su())
            .count()
    }

    pub fn statistics(&self) -> Statistics {
        let mut total_grade_points = 0.0;
        let mut graded_credits: u64 = 0;
        let mut total_credits: u64 = 0;
        let mut su_count = 0;

        for entry in self.slots.iter().flat_map(SemesterSlot::iter) {
            if !entry.is_filled() {
                continue;
            }
            // Widened so leniently imported credit values cannot overflow.
            let credits = u64::from(entry.credits);
            total_credits = total_credits.saturating_add(credits);
            if entry.exempt {
                su_count += 1;
            } else {
                graded_credits = graded_credits.saturating_add(credits);
                total_grade_points += entry.grade_point * f64::from(entry.credits);
            }
        }

        let gpa = if graded_credits > 0 {
            total_grade_points / graded_credits as f64
        } else {
            0.0
        };

        Statistics {
            gpa,
            total_credits,
            graded_credits,
            su_count,
            su_cap: self.settings.su_cap,
            at_cap: su_count >= self.settings.su_cap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::entry::GradePoint;

    fn first_slot() -> SlotIndex {
        SlotIndex::new(0).unwrap()
    }

    fn filled(ledger: &mut Ledger, slot: SlotIndex, name: &str, gpa: f64) -> usize {
        ledger.add_entry(slot).unwrap();
        let index = ledger.slot(slot).len() - 1;
        ledger
            .update_entry(slot, index, EntryUpdate::Name(name.into()))
            .unwrap();
        ledger
            .update_entry(
                slot,
                index,
                EntryUpdate::GradePoint(GradePoint::new(gpa).unwrap()),
            )
            .unwrap();
        index
    }

    #[test]
    fn add_entry_uses_defaults_and_counter() {
        let mut ledger = Ledger::new();
        let slot = first_slot();
        let first = ledger.add_entry(slot).unwrap();
        let second = ledger.add_entry(slot).unwrap();
        assert_eq!(first, EntryId(0));
        assert_eq!(second, EntryId(1));
        let entry = ledger.entry(slot, 0).unwrap();
        assert_eq!(entry.name, "");
        assert_eq!(entry.grade_point, 0.0);
        assert_eq!(entry.credits, 4);
        assert!(!entry.exempt);
        assert_eq!(ledger.next_id(), 2);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut ledger = Ledger::new();
        let slot = first_slot();
        ledger.add_entry(slot).unwrap();
        ledger.delete_entry(slot, 0).unwrap();
        assert_eq!(ledger.add_entry(slot).unwrap(), EntryId(1));
    }

    #[test]
    fn delete_shifts_positions() {
        let mut ledger = Ledger::new();
        let slot = first_slot();
        ledger.add_entry(slot).unwrap();
        let kept = ledger.add_entry(slot).unwrap();
        ledger.delete_entry(slot, 0).unwrap();
        assert_eq!(ledger.entry(slot, 0).unwrap().id, kept);
        assert_eq!(ledger.locate(kept), Some(EntryPosition { slot, index: 0 }));
    }

    #[test]
    fn missing_entry_is_reported() {
        let mut ledger = Ledger::new();
        let slot = first_slot();
        let err = ledger.toggle_exempt(slot, 3).unwrap_err();
        assert!(matches!(err, LedgerError::EntryNotFound { index: 3, .. }));
        assert!(ledger.delete_entry(slot, 0).is_err());
    }

    #[test]
    fn reset_slot_keeps_counter() {
        let mut ledger = Ledger::new();
        let slot = first_slot();
        ledger.add_entry(slot).unwrap();
        ledger.reset_slot(slot);
        assert!(ledger.slot(slot).is_empty());
        assert_eq!(ledger.add_entry(slot).unwrap(), EntryId(1));
    }

    #[test]
    fn reset_clears_everything() {
        let mut ledger = Ledger::new();
        for slot in SlotIndex::all() {
            ledger.add_entry(slot).unwrap();
        }
        ledger.reset();
        assert_eq!(ledger.entry_count(), 0);
        assert_eq!(ledger.next_id(), 0);
    }

    #[test]
    fn statistics_weight_by_credits() {
        let mut ledger = Ledger::new();
        let slot = first_slot();
        filled(&mut ledger, slot, "CS101", 4.5);
        filled(&mut ledger, slot, "MA101", 3.5);
        let stats = ledger.statistics();
        assert_eq!(stats.total_credits, 8);
        assert_eq!(stats.graded_credits, 8);
        assert_eq!(stats.su_count, 0);
        assert!((stats.gpa - 4.0).abs() < 1e-9);
        assert!(!stats.at_cap);
    }

    #[test]
    fn exempt_entries_count_only_toward_workload() {
        let mut ledger = Ledger::new();
        let slot = first_slot();
        filled(&mut ledger, slot, "CS101", 4.5);
        let second = filled(&mut ledger, slot, "MA101", 3.5);
        assert!(ledger.toggle_exempt(slot, second).unwrap());
        let stats = ledger.statistics();
        assert_eq!(stats.total_credits, 8);
        assert_eq!(stats.graded_credits, 4);
        assert_eq!(stats.su_count, 1);
        assert!((stats.gpa - 4.5).abs() < 1e-9);
    }

    #[test]
    fn gpa_is_zero_without_graded_credits() {
        let mut ledger = Ledger::new();
        let slot = first_slot();
        ledger.add_entry(slot).unwrap();
        ledger
            .update_entry(slot, 0, EntryUpdate::GradePoint(GradePoint::new(5.0).unwrap()))
            .unwrap();
        assert_eq!(ledger.statistics().gpa, 0.0);
        assert_eq!(ledger.statistics().total_credits, 0);
    }

    #[test]
    fn toggle_is_refused_at_cap() {
        let mut ledger = Ledger::with_settings(LedgerSettings {
            su_cap: 2,
            default_credits: Credits::default(),
        });
        let slot = first_slot();
        for name in ["A", "B", "C"] {
            filled(&mut ledger, slot, name, 3.0);
        }
        ledger.toggle_exempt(slot, 0).unwrap();
        ledger.toggle_exempt(slot, 1).unwrap();
        let err = ledger.toggle_exempt(slot, 2).unwrap_err();
        assert!(matches!(err, LedgerError::SuCapReached { cap: 2 }));
        assert!(!ledger.entry(slot, 2).unwrap().exempt);
        assert_eq!(ledger.su_count(), 2);
        assert!(ledger.statistics().at_cap);

        assert!(!ledger.toggle_exempt(slot, 0).unwrap());
        assert!(ledger.toggle_exempt(slot, 2).unwrap());
    }

    #[test]
    fn naming_an_exempt_placeholder_respects_cap() {
        let mut ledger = Ledger::with_settings(LedgerSettings {
            su_cap: 1,
            default_credits: Credits::default(),
        });
        let slot = first_slot();
        ledger.add_entry(slot).unwrap();
        ledger.toggle_exempt(slot, 0).unwrap();
        filled(&mut ledger, slot, "GE", 0.0);
        ledger
            .update_entry(slot, 1, EntryUpdate::Exempt(true))
            .expect("placeholder does not count yet");
        let err = ledger
            .update_entry(slot, 0, EntryUpdate::Name("CFG1002".into()))
            .unwrap_err();
        assert!(matches!(err, LedgerError::SuCapReached { .. }));
        assert_eq!(ledger.entry(slot, 0).unwrap().name, "");
        assert_eq!(ledger.su_count(), 1);
    }

    #[test]
    fn statistics_are_idempotent() {
        let mut ledger = Ledger::new();
        filled(&mut ledger, first_slot(), "CS101", 3.5);
        assert_eq!(ledger.statistics(), ledger.statistics());
    }

    #[test]
    fn default_credits_follow_settings() {
        let mut ledger = Ledger::new();
        ledger.apply_settings(LedgerSettings {
            su_cap: 8,
            default_credits: Credits::new(2).unwrap(),
        });
        ledger.add_entry(first_slot()).unwrap();
        assert_eq!(ledger.entry(first_slot(), 0).unwrap().credits, 2);
    }

    #[test]
    fn counter_refuses_to_run_past_the_last_id() {
        let mut near_end = ModuleEntry::new(EntryId(MAX_ENTRY_ID - 1), Credits::default());
        near_end.name = "CS1010".into();
        let mut slots: [SemesterSlot; SLOT_COUNT] = array::from_fn(|_| SemesterSlot::new());
        slots[0] = SemesterSlot::from_entries(vec![near_end]);
        let mut ledger = Ledger::from_slots(slots, LedgerSettings::default());

        assert_eq!(ledger.add_entry(first_slot()).unwrap(), EntryId(MAX_ENTRY_ID));
        assert!(matches!(
            ledger.add_entry(first_slot()),
            Err(LedgerError::IdsExhausted)
        ));
        assert_eq!(ledger.entry_count(), 2);
    }

    #[test]
    fn oversized_credits_do_not_overflow_totals() {
        let mut slots: [SemesterSlot; SLOT_COUNT] = array::from_fn(|_| SemesterSlot::new());
        let entries = (0..3)
            .map(|id| ModuleEntry {
                id: EntryId(id),
                name: format!("M{id}"),
                grade_point: 4.0,
                credits: u32::MAX,
                exempt: id == 2,
            })
            .collect();
        slots[0] = SemesterSlot::from_entries(entries);
        let stats = Ledger::from_slots(slots, LedgerSettings::default()).statistics();
        assert_eq!(stats.total_credits, 3 * u64::from(u32::MAX));
        assert_eq!(stats.graded_credits, 2 * u64::from(u32::MAX));
        assert!((stats.gpa - 4.0).abs() < 1e-9);
    }
}
