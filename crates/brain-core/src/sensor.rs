use std::collections::BTreeMap;

use crate::{BeaconType, EventChannel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorChange {
    Sensed,
    Lost,
    Reached,
    Left,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorChanged {
    pub beacon: BeaconType,
    pub change: SensorChange,
}

/// In-memory detection state for one agent.
///
/// Tracks how many beacons of each type are currently sensible and how many of
/// those are within reach. A beacon in reach is always sensible.
#[derive(Debug, Default)]
pub struct SensorField {
    sensible: BTreeMap<BeaconType, u32>,
    reached: BTreeMap<BeaconType, u32>,
    changed: EventChannel<SensorChanged>,
}

impl SensorField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sensible(&self, beacon: &BeaconType) -> bool {
        self.sensible_count(beacon) > 0
    }

    pub fn in_reach(&self, beacon: &BeaconType) -> bool {
        self.reached.get(beacon).copied().unwrap_or(0) > 0
    }

    pub fn sensible_count(&self, beacon: &BeaconType) -> u32 {
        self.sensible.get(beacon).copied().unwrap_or(0)
    }

    pub fn sense(&mut self, beacon: impl Into<BeaconType>) {
        let beacon = beacon.into();
        *self.sensible.entry(beacon.clone()).or_default() += 1;
        self.publish(beacon, SensorChange::Sensed);
    }

    /// Drop one detection. Returns `false` if nothing of that type was sensible.
    pub fn lose(&mut self, beacon: &BeaconType) -> bool {
        if !decrement(&mut self.sensible, beacon) {
            return false;
        }
        let remaining = self.sensible_count(beacon);
        if let Some(reached) = self.reached.get_mut(beacon) {
            *reached = (*reached).min(remaining);
        }
        self.reached.retain(|_, n| *n > 0);
        self.publish(beacon.clone(), SensorChange::Lost);
        true
    }

    /// Mark one beacon as within reach, sensing it first if needed.
    pub fn reach(&mut self, beacon: impl Into<BeaconType>) {
        let beacon = beacon.into();
        let reached = self.reached.get(&beacon).copied().unwrap_or(0);
        if reached >= self.sensible_count(&beacon) {
            *self.sensible.entry(beacon.clone()).or_default() += 1;
            self.publish(beacon.clone(), SensorChange::Sensed);
        }
        *self.reached.entry(beacon.clone()).or_default() += 1;
        self.publish(beacon, SensorChange::Reached);
    }

    pub fn leave(&mut self, beacon: &BeaconType) -> bool {
        if !decrement(&mut self.reached, beacon) {
            return false;
        }
        self.publish(beacon.clone(), SensorChange::Left);
        true
    }

    /// Remove a reached beacon from the world entirely.
    pub fn consume(&mut self, beacon: &BeaconType) -> bool {
        if !decrement(&mut self.reached, beacon) {
            return false;
        }
        decrement(&mut self.sensible, beacon);
        self.publish(beacon.clone(), SensorChange::Lost);
        true
    }

    pub fn on_changed(&mut self) -> &mut EventChannel<SensorChanged> {
        &mut self.changed
    }

    fn publish(&mut self, beacon: BeaconType, change: SensorChange) {
        self.changed.publish(&SensorChanged { beacon, change });
    }
}

fn decrement(counts: &mut BTreeMap<BeaconType, u32>, beacon: &BeaconType) -> bool {
    let Some(n) = counts.get_mut(beacon) else {
        return false;
    };
    *n -= 1;
    if *n == 0 {
        counts.remove(beacon);
    }
    true
}
