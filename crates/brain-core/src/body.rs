use crate::{
    AgentId, BeaconType, ResourceKey, SensorField, StatusBank, Steering, WorldMut, WorldView,
};

/// A single agent's collaborators bundled as a world.
///
/// Queries ignore the `agent` argument; use one body per agent. Unknown
/// resources read as `0.0`.
#[derive(Debug)]
pub struct AgentBody {
    pub status: StatusBank,
    pub sensors: SensorField,
    pub steering: Steering,
}

impl AgentBody {
    pub fn new() -> Self {
        Self {
            status: StatusBank::new(),
            sensors: SensorField::new(),
            steering: Steering::Stop,
        }
    }
}

impl Default for AgentBody {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldView for AgentBody {
    fn resource(&self, _agent: AgentId, resource: &ResourceKey) -> f32 {
        self.status.value(resource).unwrap_or(0.0)
    }

    fn resource_min(&self, _agent: AgentId, resource: &ResourceKey) -> f32 {
        self.status.min(resource).unwrap_or(0.0)
    }

    fn resource_max(&self, _agent: AgentId, resource: &ResourceKey) -> f32 {
        self.status.max(resource).unwrap_or(0.0)
    }

    fn is_sensible(&self, _agent: AgentId, beacon: &BeaconType) -> bool {
        self.sensors.is_sensible(beacon)
    }

    fn in_reach(&self, _agent: AgentId, beacon: &BeaconType) -> bool {
        self.sensors.in_reach(beacon)
    }
}

impl WorldMut for AgentBody {
    fn change_resource(&mut self, _agent: AgentId, resource: &ResourceKey, delta: f32) {
        self.status.add(resource, delta);
    }

    fn consume_beacon(&mut self, _agent: AgentId, beacon: &BeaconType) -> bool {
        self.sensors.consume(beacon)
    }

    fn steer(&mut self, _agent: AgentId, steering: Steering) {
        self.steering = steering;
    }
}
