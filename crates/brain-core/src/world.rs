use std::borrow::Cow;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::AgentId;

macro_rules! name_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(Cow<'static, str>);

        impl $name {
            pub const fn from_static(name: &'static str) -> Self {
                Self(Cow::Borrowed(name))
            }

            pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
                Self(name.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&'static str> for $name {
            fn from(value: &'static str) -> Self {
                Self::from_static(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(Cow::Owned(value))
            }
        }
    };
}

name_key!(
    /// A numeric agent resource such as stamina, health or carried ore.
    ResourceKey
);

name_key!(
    /// Category of a sensed point of interest (deposit, rest, damage, ...).
    BeaconType
);

/// Locomotion request handed to the external movement driver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Steering {
    /// Drift in a direction (radians) with no destination.
    Wander { heading: f32 },
    /// Head for the nearest sensible beacon of this type.
    MoveTo(BeaconType),
    Stop,
}

/// Read-only view of the collaborators an agent's decisions depend on.
///
/// Status values and sensor state are owned elsewhere; the planner only queries
/// them. Implementations serving several agents key every query by `agent`.
pub trait WorldView {
    fn resource(&self, agent: AgentId, resource: &ResourceKey) -> f32;
    fn resource_min(&self, agent: AgentId, resource: &ResourceKey) -> f32;
    fn resource_max(&self, agent: AgentId, resource: &ResourceKey) -> f32;

    fn is_sensible(&self, agent: AgentId, beacon: &BeaconType) -> bool;
    fn in_reach(&self, agent: AgentId, beacon: &BeaconType) -> bool;
}

/// Effect sink for actions.
pub trait WorldMut: WorldView {
    fn change_resource(&mut self, agent: AgentId, resource: &ResourceKey, delta: f32);

    /// Remove one reached beacon of `beacon` type. Returns `false` if none was in reach.
    fn consume_beacon(&mut self, agent: AgentId, beacon: &BeaconType) -> bool;

    fn steer(&mut self, agent: AgentId, steering: Steering);
}
