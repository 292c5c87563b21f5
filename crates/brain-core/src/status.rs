use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{EventChannel, ResourceKey};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResourceLevel {
    pub min: f32,
    pub max: f32,
    pub value: f32,
}

impl ResourceLevel {
    /// Swapped bounds are reordered. A NaN bound leaves that side unbounded.
    pub fn new(min: f32, max: f32, value: f32) -> Self {
        let min = if min.is_nan() { f32::NEG_INFINITY } else { min };
        let max = if max.is_nan() { f32::INFINITY } else { max };
        let (min, max) = if max < min { (max, min) } else { (min, max) };
        Self {
            min,
            max,
            value: value.clamp(min, max),
        }
    }

    pub fn is_full(&self) -> bool {
        self.value >= self.max
    }

    pub fn is_empty(&self) -> bool {
        self.value <= self.min
    }

    /// Position of `value` within `[min, max]`, `1.0` for a degenerate range.
    pub fn fraction(&self) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            1.0
        } else {
            (self.value - self.min) / span
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusChanged {
    pub resource: ResourceKey,
    pub previous: f32,
    pub current: f32,
}

/// In-memory agent status: bounded numeric resources plus a change notification.
///
/// Writes clamp to `[min, max]`. `StatusChanged` is published only when the stored
/// value actually moves, so redundant writes never wake subscribers.
#[derive(Debug, Default)]
pub struct StatusBank {
    levels: BTreeMap<ResourceKey, ResourceLevel>,
    changed: EventChannel<StatusChanged>,
}

impl StatusBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or redefine) a resource. Does not notify.
    pub fn define(
        &mut self,
        resource: impl Into<ResourceKey>,
        min: f32,
        max: f32,
        initial: f32,
    ) -> &mut Self {
        self.levels
            .insert(resource.into(), ResourceLevel::new(min, max, initial));
        self
    }

    pub fn level(&self, resource: &ResourceKey) -> Option<ResourceLevel> {
        self.levels.get(resource).copied()
    }

    pub fn value(&self, resource: &ResourceKey) -> Option<f32> {
        self.levels.get(resource).map(|l| l.value)
    }

    pub fn min(&self, resource: &ResourceKey) -> Option<f32> {
        self.levels.get(resource).map(|l| l.min)
    }

    pub fn max(&self, resource: &ResourceKey) -> Option<f32> {
        self.levels.get(resource).map(|l| l.max)
    }

    pub fn resources(&self) -> impl Iterator<Item = (&ResourceKey, &ResourceLevel)> {
        self.levels.iter()
    }

    /// Set a resource, clamped. Returns the stored value, `None` for unknown resources.
    pub fn set(&mut self, resource: &ResourceKey, value: f32) -> Option<f32> {
        let level = self.levels.get_mut(resource)?;
        let previous = level.value;
        let current = value.clamp(level.min, level.max);
        level.value = current;

        if current != previous {
            self.changed.publish(&StatusChanged {
                resource: resource.clone(),
                previous,
                current,
            });
        }
        Some(current)
    }

    pub fn add(&mut self, resource: &ResourceKey, delta: f32) -> Option<f32> {
        let value = self.value(resource)?;
        self.set(resource, value + delta)
    }

    pub fn on_changed(&mut self) -> &mut EventChannel<StatusChanged> {
        &mut self.changed
    }
}
