//! The scripted world agents live in.

use std::collections::BTreeMap;

use brain_core::{AgentBody, AgentId, BeaconType, ResourceKey, Steering, WorldMut, WorldView};

use crate::scenario::WorldChange;

/// One body per agent, plus a crude movement model: an agent steering toward a
/// sensible beacon reaches it after a fixed number of ticks.
#[derive(Debug, Default)]
pub struct SimWorld {
    bodies: BTreeMap<AgentId, AgentBody>,
    trips: BTreeMap<AgentId, Trip>,
    travel_ticks: u32,
}

#[derive(Debug, Clone)]
struct Trip {
    beacon: BeaconType,
    remaining: u32,
}

impl SimWorld {
    pub fn new(travel_ticks: u32) -> Self {
        Self {
            travel_ticks,
            ..Self::default()
        }
    }

    pub fn spawn(&mut self, agent: AgentId, body: AgentBody) {
        self.bodies.insert(agent, body);
    }

    pub fn agents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.bodies.keys().copied()
    }

    pub fn body(&self, agent: AgentId) -> Option<&AgentBody> {
        self.bodies.get(&agent)
    }

    pub fn apply(&mut self, agent: AgentId, change: &WorldChange) {
        let Some(body) = self.bodies.get_mut(&agent) else {
            tracing::warn!(agent = %agent, "script event for unknown agent");
            return;
        };
        tracing::info!(agent = %agent, ?change, "world change");
        match change {
            WorldChange::Sense(beacon) => body.sensors.sense(beacon.clone()),
            WorldChange::Lose(beacon) => {
                body.sensors.lose(beacon);
            }
            WorldChange::Reach(beacon) => body.sensors.reach(beacon.clone()),
            WorldChange::Leave(beacon) => {
                body.sensors.leave(beacon);
            }
            WorldChange::Set { resource, value } => {
                body.status.set(resource, *value);
            }
        }
    }

    /// Advance every trip by one tick.
    pub fn advance(&mut self) {
        let bodies = &mut self.bodies;
        self.trips.retain(|agent, trip| {
            let Some(body) = bodies.get_mut(agent) else {
                return false;
            };
            if !body.sensors.is_sensible(&trip.beacon) || body.sensors.in_reach(&trip.beacon) {
                return false;
            }
            trip.remaining = trip.remaining.saturating_sub(1);
            if trip.remaining > 0 {
                return true;
            }
            tracing::debug!(agent = %agent, beacon = %trip.beacon, "arrived");
            body.sensors.reach(trip.beacon.clone());
            false
        });
    }

    fn expect_body(&self, agent: AgentId) -> Option<&AgentBody> {
        let body = self.bodies.get(&agent);
        if body.is_none() {
            tracing::warn!(agent = %agent, "query for unknown agent");
        }
        body
    }
}

impl WorldView for SimWorld {
    fn resource(&self, agent: AgentId, resource: &ResourceKey) -> f32 {
        self.expect_body(agent)
            .map_or(0.0, |b| b.resource(agent, resource))
    }

    fn resource_min(&self, agent: AgentId, resource: &ResourceKey) -> f32 {
        self.expect_body(agent)
            .map_or(0.0, |b| b.resource_min(agent, resource))
    }

    fn resource_max(&self, agent: AgentId, resource: &ResourceKey) -> f32 {
        self.expect_body(agent)
            .map_or(0.0, |b| b.resource_max(agent, resource))
    }

    fn is_sensible(&self, agent: AgentId, beacon: &BeaconType) -> bool {
        self.expect_body(agent)
            .is_some_and(|b| b.is_sensible(agent, beacon))
    }

    fn in_reach(&self, agent: AgentId, beacon: &BeaconType) -> bool {
        self.expect_body(agent)
            .is_some_and(|b| b.in_reach(agent, beacon))
    }
}

impl WorldMut for SimWorld {
    fn change_resource(&mut self, agent: AgentId, resource: &ResourceKey, delta: f32) {
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.change_resource(agent, resource, delta);
        }
    }

    fn consume_beacon(&mut self, agent: AgentId, beacon: &BeaconType) -> bool {
        self.bodies
            .get_mut(&agent)
            .is_some_and(|b| b.consume_beacon(agent, beacon))
    }

    fn steer(&mut self, agent: AgentId, steering: Steering) {
        match &steering {
            Steering::MoveTo(beacon) => {
                self.trips.insert(
                    agent,
                    Trip {
                        beacon: beacon.clone(),
                        remaining: self.travel_ticks,
                    },
                );
            }
            Steering::Wander { .. } | Steering::Stop => {
                self.trips.remove(&agent);
            }
        }
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.steer(agent, steering);
        }
    }
}
