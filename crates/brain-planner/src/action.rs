//! Actions: the executable units a goal is made of.
//!
//! Every action kind follows one lifecycle. `execute` starts an activation,
//! `update` advances it once per tick, and exactly one of `execute_consequences`
//! (natural finish) or `execute_break` (preemption) ends it. Both terminal calls
//! require a running activation, so neither can happen twice or after the other.

use brain_core::{AgentId, BeaconType, ResourceKey, Steering, TickContext, WorldMut, WorldView};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ConfigError, PlannerError};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResourceDelta {
    pub resource: ResourceKey,
    pub amount: f32,
}

impl ResourceDelta {
    pub fn new(resource: impl Into<ResourceKey>, amount: f32) -> Self {
        Self {
            resource: resource.into(),
            amount,
        }
    }
}

/// Continuous resource drain applied while an `Interact` runs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Drain {
    pub resource: ResourceKey,
    pub per_second: f32,
}

impl Drain {
    pub fn new(resource: impl Into<ResourceKey>, per_second: f32) -> Self {
        Self {
            resource: resource.into(),
            per_second,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ActionKind {
    /// Wander with no destination. Never finishes on its own.
    MoveRandomly {
        #[cfg_attr(feature = "serde", serde(default = "default_retarget_seconds"))]
        retarget_seconds: f32,
    },
    /// Head for a beacon; finishes once one is in reach.
    GoToBeacon { beacon: BeaconType },
    /// Work on a reached beacon for a fixed time.
    Interact {
        beacon: BeaconType,
        duration_seconds: f32,
        #[cfg_attr(feature = "serde", serde(default))]
        drain: Option<Drain>,
        #[cfg_attr(feature = "serde", serde(default))]
        on_finish: Vec<ResourceDelta>,
        #[cfg_attr(feature = "serde", serde(default))]
        consume_target: bool,
    },
}

#[cfg(feature = "serde")]
fn default_retarget_seconds() -> f32 {
    DEFAULT_RETARGET_SECONDS
}

#[cfg(feature = "serde")]
fn default_interruptible() -> bool {
    true
}

pub const DEFAULT_RETARGET_SECONDS: f32 = 2.0;

/// Registration data for one action.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionSpec {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: ActionKind,
    /// Backs `can_break`. Atomic actions set this to `false`.
    #[cfg_attr(feature = "serde", serde(default = "default_interruptible"))]
    pub interruptible: bool,
}

impl ActionSpec {
    pub fn new(name: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            interruptible: true,
        }
    }

    pub fn move_randomly(name: impl Into<String>) -> Self {
        Self::new(
            name,
            ActionKind::MoveRandomly {
                retarget_seconds: DEFAULT_RETARGET_SECONDS,
            },
        )
    }

    pub fn go_to_beacon(name: impl Into<String>, beacon: impl Into<BeaconType>) -> Self {
        Self::new(
            name,
            ActionKind::GoToBeacon {
                beacon: beacon.into(),
            },
        )
    }

    pub fn interact(
        name: impl Into<String>,
        beacon: impl Into<BeaconType>,
        duration_seconds: f32,
    ) -> Self {
        Self::new(
            name,
            ActionKind::Interact {
                beacon: beacon.into(),
                duration_seconds,
                drain: None,
                on_finish: Vec::new(),
                consume_target: false,
            },
        )
    }

    /// Sets the drain of an `Interact`; ignored for other kinds.
    pub fn draining(mut self, drain: Drain) -> Self {
        if let ActionKind::Interact { drain: slot, .. } = &mut self.kind {
            *slot = Some(drain);
        }
        self
    }

    /// Adds a finish effect to an `Interact`; ignored for other kinds.
    pub fn on_finish(mut self, delta: ResourceDelta) -> Self {
        if let ActionKind::Interact { on_finish, .. } = &mut self.kind {
            on_finish.push(delta);
        }
        self
    }

    pub fn consuming_target(mut self) -> Self {
        if let ActionKind::Interact { consume_target, .. } = &mut self.kind {
            *consume_target = true;
        }
        self
    }

    pub fn uninterruptible(mut self) -> Self {
        self.interruptible = false;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidActionParameter {
            action: self.name.clone(),
            reason: reason.to_string(),
        };

        match &self.kind {
            ActionKind::MoveRandomly { retarget_seconds } => {
                if !retarget_seconds.is_finite() || *retarget_seconds <= 0.0 {
                    return Err(invalid("retarget_seconds must be positive"));
                }
            }
            ActionKind::GoToBeacon { .. } => {}
            ActionKind::Interact {
                duration_seconds,
                drain,
                on_finish,
                ..
            } => {
                if !duration_seconds.is_finite() || *duration_seconds < 0.0 {
                    return Err(invalid("duration_seconds must be finite and non-negative"));
                }
                if let Some(drain) = drain {
                    if !drain.per_second.is_finite() || drain.per_second < 0.0 {
                        return Err(invalid("drain rate must be finite and non-negative"));
                    }
                }
                if on_finish.iter().any(|d| !d.amount.is_finite()) {
                    return Err(invalid("finish effects must be finite"));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionState {
    NotStarted,
    Running,
    Finished,
    Broken,
}

/// A registered action with its runtime progress.
#[derive(Debug, Clone)]
pub struct Action {
    spec: ActionSpec,
    state: ActionState,
    elapsed: f32,
    drained: f32,
    retarget_in: f32,
    activations: u64,
}

impl Action {
    pub fn new(spec: ActionSpec) -> Self {
        Self {
            spec,
            state: ActionState::NotStarted,
            elapsed: 0.0,
            drained: 0.0,
            retarget_in: 0.0,
            activations: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ActionState::Running
    }

    /// Seconds spent in the current (or last) activation.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn activations(&self) -> u64 {
        self.activations
    }

    pub fn can_start<W: WorldView + ?Sized>(&self, agent: AgentId, world: &W) -> bool {
        match &self.spec.kind {
            ActionKind::MoveRandomly { .. } => true,
            ActionKind::GoToBeacon { beacon } => world.is_sensible(agent, beacon),
            ActionKind::Interact { beacon, .. } => world.in_reach(agent, beacon),
        }
    }

    pub fn execute<W: WorldMut + ?Sized>(
        &mut self,
        ctx: &TickContext,
        agent: AgentId,
        world: &mut W,
    ) -> Result<(), PlannerError> {
        if self.is_running() {
            return Err(PlannerError::ReentrantExecute {
                action: self.spec.name.clone(),
            });
        }

        self.state = ActionState::Running;
        self.elapsed = 0.0;
        self.drained = 0.0;
        self.activations += 1;

        match &self.spec.kind {
            ActionKind::MoveRandomly { retarget_seconds } => {
                self.retarget_in = *retarget_seconds;
                let heading = self.pick_heading(ctx, agent);
                world.steer(agent, Steering::Wander { heading });
            }
            ActionKind::GoToBeacon { beacon } => {
                world.steer(agent, Steering::MoveTo(beacon.clone()));
            }
            ActionKind::Interact { .. } => world.steer(agent, Steering::Stop),
        }
        Ok(())
    }

    pub fn update<W: WorldMut + ?Sized>(
        &mut self,
        ctx: &TickContext,
        agent: AgentId,
        world: &mut W,
    ) {
        if !self.is_running() {
            return;
        }
        let dt = ctx.dt_seconds.max(0.0);

        match &self.spec.kind {
            ActionKind::MoveRandomly { retarget_seconds } => {
                let retarget_seconds = *retarget_seconds;
                self.elapsed += dt;
                self.retarget_in -= dt;
                if self.retarget_in <= 0.0 {
                    self.retarget_in = retarget_seconds;
                    let heading = self.pick_heading(ctx, agent);
                    world.steer(agent, Steering::Wander { heading });
                }
            }
            ActionKind::GoToBeacon { .. } => self.elapsed += dt,
            ActionKind::Interact {
                duration_seconds,
                drain,
                ..
            } => {
                // Clamp the last step so one activation never drains past rate * duration.
                let remaining = (*duration_seconds - self.elapsed).max(0.0);
                if dt >= remaining {
                    self.elapsed = *duration_seconds;
                } else {
                    self.elapsed += dt;
                }

                if let Some(drain) = drain {
                    let target = drain.per_second * self.elapsed;
                    let delta = target - self.drained;
                    self.drained = target;
                    if delta > 0.0 {
                        world.change_resource(agent, &drain.resource, -delta);
                    }
                }
            }
        }
    }

    pub fn is_finished<W: WorldView + ?Sized>(&self, agent: AgentId, world: &W) -> bool {
        match &self.spec.kind {
            ActionKind::MoveRandomly { .. } => false,
            ActionKind::GoToBeacon { beacon } => world.in_reach(agent, beacon),
            ActionKind::Interact {
                duration_seconds, ..
            } => self.elapsed >= *duration_seconds,
        }
    }

    /// Apply the effects of a natural finish and end the activation.
    pub fn execute_consequences<W: WorldMut + ?Sized>(
        &mut self,
        _ctx: &TickContext,
        agent: AgentId,
        world: &mut W,
    ) -> Result<(), PlannerError> {
        self.require_running()?;
        self.state = ActionState::Finished;

        match &self.spec.kind {
            ActionKind::MoveRandomly { .. } => {}
            ActionKind::GoToBeacon { .. } => world.steer(agent, Steering::Stop),
            ActionKind::Interact {
                beacon,
                on_finish,
                consume_target,
                ..
            } => {
                for delta in on_finish {
                    world.change_resource(agent, &delta.resource, delta.amount);
                }
                if *consume_target && !world.consume_beacon(agent, beacon) {
                    tracing::warn!(
                        agent = %agent,
                        action = %self.spec.name,
                        beacon = %beacon,
                        "target beacon was gone before it could be consumed"
                    );
                }
            }
        }
        Ok(())
    }

    pub fn can_break(&self) -> bool {
        self.spec.interruptible
    }

    /// End the activation early. Finish effects are not applied.
    pub fn execute_break<W: WorldMut + ?Sized>(
        &mut self,
        _ctx: &TickContext,
        agent: AgentId,
        world: &mut W,
    ) -> Result<(), PlannerError> {
        self.require_running()?;
        self.state = ActionState::Broken;
        world.steer(agent, Steering::Stop);
        Ok(())
    }

    fn require_running(&self) -> Result<(), PlannerError> {
        if self.is_running() {
            Ok(())
        } else {
            Err(PlannerError::NotRunning {
                action: self.spec.name.clone(),
            })
        }
    }

    fn pick_heading(&self, ctx: &TickContext, agent: AgentId) -> f32 {
        ctx.rng_for(agent, self.activations).next_heading()
    }
}
