#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use gpa_core::{
    config::ConfigManager,
    ledger::{Credits, EntryId, EntryUpdate, GradePoint, Ledger, SlotIndex},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn setup_config_manager() -> ConfigManager {
    ConfigManager::with_base_dir(temp_home()).expect("create config manager for temp dir")
}

pub fn slot(number: usize) -> SlotIndex {
    SlotIndex::from_number(number).expect("valid semester number")
}

/// Adds a fully filled module and returns its id.
pub fn add_module(
    ledger: &mut Ledger,
    slot: SlotIndex,
    name: &str,
    grade_point: f64,
    credits: i64,
    exempt: bool,
) -> EntryId {
    let id = ledger.add_entry(slot).expect("add entry");
    let index = ledger.position_of(id).expect("fresh entry").index;
    let updates = [
        EntryUpdate::Name(name.to_string()),
        EntryUpdate::GradePoint(GradePoint::new(grade_point).expect("legal grade point")),
        EntryUpdate::Credits(Credits::new(credits).expect("legal credits")),
        EntryUpdate::Exempt(exempt),
    ];
    for update in updates {
        ledger.update_entry(slot, index, update).expect("apply update");
    }
    id
}
