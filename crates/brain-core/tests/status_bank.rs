use std::sync::{Arc, Mutex};

use brain_core::{ResourceKey, StatusBank, StatusChanged};

const STAMINA: ResourceKey = ResourceKey::from_static("stamina");

fn recorded(bank: &mut StatusBank) -> Arc<Mutex<Vec<StatusChanged>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    bank.on_changed()
        .subscribe(move |e: &StatusChanged| sink.lock().unwrap().push(e.clone()));
    log
}

#[test]
fn writes_clamp_to_bounds() {
    let mut bank = StatusBank::new();
    bank.define(STAMINA, 0.0, 10.0, 4.0);

    assert_eq!(bank.add(&STAMINA, 100.0), Some(10.0));
    assert_eq!(bank.add(&STAMINA, -100.0), Some(0.0));
    assert_eq!(bank.set(&ResourceKey::from_static("mana"), 1.0), None);
}

#[test]
fn notifies_only_on_actual_change() {
    let mut bank = StatusBank::new();
    bank.define(STAMINA, 0.0, 10.0, 10.0);
    let log = recorded(&mut bank);

    bank.add(&STAMINA, 5.0); // already full
    bank.set(&STAMINA, 10.0);
    bank.add(&STAMINA, -2.5);

    let events = log.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].previous, 10.0);
    assert_eq!(events[0].current, 7.5);
}

#[test]
fn level_reports_fraction_and_fullness() {
    let mut bank = StatusBank::new();
    bank.define("ore", 0.0, 4.0, 1.0);

    let level = bank.level(&ResourceKey::from_static("ore")).unwrap();
    assert_eq!(level.fraction(), 0.25);
    assert!(!level.is_full());
    assert!(!level.is_empty());
}

#[test]
fn nan_bounds_leave_that_side_open() {
    let mut bank = StatusBank::new();
    bank.define(STAMINA, f32::NAN, 10.0, 4.0);

    assert_eq!(bank.min(&STAMINA), Some(f32::NEG_INFINITY));
    assert_eq!(bank.add(&STAMINA, 100.0), Some(10.0));
    assert_eq!(bank.add(&STAMINA, -50.0), Some(-40.0));

    let ore = ResourceKey::from_static("ore");
    bank.define(ore.clone(), f32::NAN, f32::NAN, 2.0);
    assert_eq!(bank.add(&ore, 1.0e6), Some(1_000_002.0));
}
