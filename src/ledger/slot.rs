use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

use super::entry::ModuleEntry;

pub const SLOT_COUNT: usize = 8;

const SLOT_TITLES: [&str; SLOT_COUNT] = [
    "Year 1 Sem 1",
    "Year 1 Sem 2",
    "Year 2 Sem 1",
    "Year 2 Sem 2",
    "Year 3 Sem 1",
    "Year 3 Sem 2",
    "Year 4 Sem 1",
    "Year 4 Sem 2",
];

/// Zero-based index of one of the eight semester slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(u8);

impl SlotIndex {
    pub fn new(index: usize) -> Result<Self> {
        if index < SLOT_COUNT {
            Ok(Self(index as u8))
        } else {
            Err(LedgerError::SlotOutOfRange(index + 1))
        }
    }

    /// Resolves a one-based semester number as typed by a user.
    pub fn from_number(number: usize) -> Result<Self> {
        match number.checked_sub(1) {
            Some(index) => Self::new(index),
            None => Err(LedgerError::SlotOutOfRange(number)),
        }
    }

    pub fn get(self) -> usize {
        usize::from(self.0)
    }

    pub fn number(self) -> usize {
        self.get() + 1
    }

    pub fn title(self) -> &'static str {
        SLOT_TITLES[self.get()]
    }

    pub fn all() -> impl Iterator<Item = SlotIndex> {
        (0..SLOT_COUNT as u8).map(SlotIndex)
    }
}

impl TryFrom<usize> for SlotIndex {
    type Error = LedgerError;

    fn try_from(index: usize) -> Result<Self> {
        Self::new(index)
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Ordered module list for one semester. Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SemesterSlot {
    entries: Vec<ModuleEntry>,
}

impl SemesterSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<ModuleEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ModuleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ModuleEntry> {
        self.entries.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut ModuleEntry> {
        self.entries.get_mut(index)
    }

    pub(crate) fn push(&mut self, entry: ModuleEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<ModuleEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_numbers_are_one_based() {
        let slot = SlotIndex::from_number(1).unwrap();
        assert_eq!(slot.get(), 0);
        assert_eq!(slot.title(), "Year 1 Sem 1");
        assert_eq!(SlotIndex::from_number(8).unwrap().title(), "Year 4 Sem 2");
    }

    #[test]
    fn out_of_range_slots_are_rejected() {
        assert!(matches!(
            SlotIndex::from_number(0),
            Err(LedgerError::SlotOutOfRange(0))
        ));
        assert!(matches!(
            SlotIndex::from_number(9),
            Err(LedgerError::SlotOutOfRange(9))
        ));
        assert!(SlotIndex::new(8).is_err());
        assert_eq!(SlotIndex::all().count(), SLOT_COUNT);
    }
}
