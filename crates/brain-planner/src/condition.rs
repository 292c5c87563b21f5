use brain_core::{AgentId, BeaconType, ResourceKey, WorldView};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Data form of a goal's start predicate.
///
/// Evaluation only reads the world, so a condition can be checked for every goal on
/// every event without side effects.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Condition {
    #[default]
    Always,
    Sensible(BeaconType),
    InReach(BeaconType),
    AtMax(ResourceKey),
    AtMin(ResourceKey),
    Below { resource: ResourceKey, value: f32 },
    AtLeast { resource: ResourceKey, value: f32 },
    /// Value sits below `fraction` of the way from min to max.
    BelowFraction { resource: ResourceKey, fraction: f32 },
    Not(Box<Condition>),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    pub fn not(condition: Condition) -> Self {
        Condition::Not(Box::new(condition))
    }

    pub fn evaluate(&self, agent: AgentId, world: &dyn WorldView) -> bool {
        match self {
            Condition::Always => true,
            Condition::Sensible(beacon) => world.is_sensible(agent, beacon),
            Condition::InReach(beacon) => world.in_reach(agent, beacon),
            Condition::AtMax(resource) => {
                world.resource(agent, resource) >= world.resource_max(agent, resource)
            }
            Condition::AtMin(resource) => {
                world.resource(agent, resource) <= world.resource_min(agent, resource)
            }
            Condition::Below { resource, value } => world.resource(agent, resource) < *value,
            Condition::AtLeast { resource, value } => world.resource(agent, resource) >= *value,
            Condition::BelowFraction { resource, fraction } => {
                let min = world.resource_min(agent, resource);
                let max = world.resource_max(agent, resource);
                let value = world.resource(agent, resource);
                value < min + (max - min) * fraction
            }
            Condition::Not(inner) => !inner.evaluate(agent, world),
            Condition::All(all) => all.iter().all(|c| c.evaluate(agent, world)),
            Condition::Any(any) => any.iter().any(|c| c.evaluate(agent, world)),
        }
    }

    /// True when the condition holds regardless of world state.
    pub fn is_unconditional(&self) -> bool {
        match self {
            Condition::Always => true,
            Condition::All(all) => all.iter().all(Condition::is_unconditional),
            Condition::Any(any) => any.iter().any(Condition::is_unconditional),
            _ => false,
        }
    }
}
