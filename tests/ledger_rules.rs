mod common;

use common::{add_module, slot};
use gpa_core::{
    errors::LedgerError,
    ledger::{EntryUpdate, GpaBand, Ledger, LedgerSettings, SlotIndex, DEFAULT_SU_CAP},
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn two_graded_modules_average_by_credits() {
    let mut ledger = Ledger::new();
    add_module(&mut ledger, slot(1), "CS101", 4.5, 4, false);
    add_module(&mut ledger, slot(1), "MA101", 3.5, 4, false);

    let stats = ledger.statistics();
    assert_eq!(stats.total_credits, 8);
    assert_eq!(stats.graded_credits, 8);
    assert_eq!(stats.su_count, 0);
    assert_close(stats.gpa, 4.0);
}

#[test]
fn exempt_module_counts_credits_but_not_grade() {
    let mut ledger = Ledger::new();
    add_module(&mut ledger, slot(1), "CS101", 4.5, 4, false);
    add_module(&mut ledger, slot(1), "MA101", 3.5, 4, true);

    let stats = ledger.statistics();
    assert_eq!(stats.total_credits, 8);
    assert_eq!(stats.graded_credits, 4);
    assert_eq!(stats.su_count, 1);
    assert_eq!(stats.exempt_credits(), 4);
    assert_close(stats.gpa, 4.5);
    assert_eq!(stats.band(), GpaBand::High);
}

#[test]
fn ninth_exemption_is_rejected_at_default_cap() {
    let mut ledger = Ledger::new();
    for (n, number) in (1..=8).enumerate() {
        add_module(&mut ledger, slot(number), &format!("SU{n}"), 3.0, 4, true);
    }
    let ninth = add_module(&mut ledger, slot(8), "EXTRA", 3.0, 4, false);
    let position = ledger.position_of(ninth).unwrap();

    let err = ledger
        .toggle_exempt(position.slot, position.index)
        .unwrap_err();
    assert!(matches!(err, LedgerError::SuCapReached { cap: DEFAULT_SU_CAP }));
    assert_eq!(err.to_string(), "Maximum of 8 S/U modules allowed!");
    assert_eq!(ledger.su_count(), 8);
    assert!(!ledger.entry(position.slot, position.index).unwrap().exempt);
    assert!(ledger.statistics().at_cap);
}

#[test]
fn unfilled_rows_are_ignored_by_statistics() {
    let mut ledger = Ledger::new();
    let blank = ledger.add_entry(slot(2)).unwrap();
    let position = ledger.position_of(blank).unwrap();
    ledger
        .update_entry(position.slot, position.index, EntryUpdate::Exempt(true))
        .unwrap();

    let stats = ledger.statistics();
    assert_eq!(stats.total_credits, 0);
    assert_eq!(stats.su_count, 0);
    assert_close(stats.gpa, 0.0);
}

#[test]
fn totals_stay_consistent_across_edits() {
    let mut ledger = Ledger::with_settings(LedgerSettings {
        su_cap: 3,
        ..LedgerSettings::default()
    });
    let grades = [5.0, 4.0, 3.5, 2.0, 0.0, 4.5];
    for (n, grade) in grades.iter().enumerate() {
        let exempt = n % 2 == 0;
        add_module(&mut ledger, slot(n % 8 + 1), &format!("M{n}"), *grade, 2 + n as i64, exempt);
    }

    let check = |ledger: &Ledger| {
        let stats = ledger.statistics();
        assert!(stats.graded_credits <= stats.total_credits);
        assert!(stats.su_count <= stats.su_cap);
        assert!((0.0..=5.0).contains(&stats.gpa));
        assert_eq!(
            stats.graded_credits + stats.exempt_credits(),
            stats.total_credits
        );
    };

    check(&ledger);
    ledger.delete_entry(slot(1), 0).unwrap();
    check(&ledger);
    ledger.reset_slot(slot(2));
    check(&ledger);
}

#[test]
fn ids_survive_deletes_and_positions_shift() {
    let mut ledger = Ledger::new();
    let first = add_module(&mut ledger, slot(3), "A", 4.0, 4, false);
    let second = add_module(&mut ledger, slot(3), "B", 4.0, 4, false);
    let third = add_module(&mut ledger, slot(3), "C", 4.0, 4, false);

    let removed = ledger.delete_entry(slot(3), 1).unwrap();
    assert_eq!(removed.id, second);
    assert_eq!(ledger.position_of(first).unwrap().index, 0);
    assert_eq!(ledger.position_of(third).unwrap().index, 1);
    assert!(matches!(
        ledger.position_of(second),
        Err(LedgerError::UnknownEntry(id)) if id == second
    ));

    let next = ledger.add_entry(slot(3)).unwrap();
    assert!(next.0 > third.0);
}

#[test]
fn out_of_range_positions_are_errors() {
    let mut ledger = Ledger::new();
    let target = SlotIndex::new(4).unwrap();
    assert!(matches!(
        ledger.delete_entry(target, 0),
        Err(LedgerError::EntryNotFound { index: 0, .. })
    ));
    assert!(ledger.toggle_exempt(target, 3).is_err());
    assert!(SlotIndex::new(8).is_err());
    assert!(SlotIndex::from_number(0).is_err());
}
