//! Drives planners and the scripted world tick by tick.

use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{Context, Result};
use serde::Serialize;

use brain_core::{TickContext, WorldView};
use brain_planner::{tick_planners, Planner, PlannerSnapshot};
use brain_tools::{TraceEvent, TraceSink};

use crate::scenario::{Scenario, ScriptEvent};
use crate::world::SimWorld;

/// Forwards planner trace events to the runner.
struct ChannelTraceSink(Sender<TraceEvent>);

impl TraceSink for ChannelTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        let _ = self.0.send(event);
    }
}

/// Final state of one agent.
#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    #[serde(flatten)]
    pub planner: PlannerSnapshot,
    pub resources: Vec<(String, f32)>,
}

pub struct Simulation {
    world: SimWorld,
    planners: Vec<Planner>,
    script: Vec<ScriptEvent>,
    ctx: TickContext,
    trace: Receiver<TraceEvent>,
}

impl Simulation {
    /// Build every agent's planner and body. Fails on the first invalid blueprint.
    pub fn new(scenario: &Scenario) -> Result<Self> {
        let (tx, trace) = mpsc::channel();
        let mut world = SimWorld::new(scenario.travel_ticks);
        let mut planners = Vec::with_capacity(scenario.agents.len());

        for agent in &scenario.agents {
            let blueprint = scenario.blueprint_for(agent)?.clone();
            let planner = blueprint
                .into_builder(agent.id)
                .config(scenario.planner_config())
                .trace_sink(Box::new(ChannelTraceSink(tx.clone())))
                .build()
                .with_context(|| {
                    format!("{} has an invalid blueprint `{}`", agent.id, agent.blueprint)
                })?;

            let mut body = agent.body();
            let mailbox = planner.mailbox();
            mailbox.watch_status(body.status.on_changed());
            mailbox.watch_sensors(body.sensors.on_changed());

            world.spawn(agent.id, body);
            planners.push(planner);
        }

        planners.sort_by_key(Planner::agent);

        let mut script = scenario.script.clone();
        script.sort_by_key(|event| event.at);

        Ok(Self {
            world,
            planners,
            script,
            ctx: TickContext::new(0, scenario.dt_seconds).with_seed(scenario.seed),
            trace,
        })
    }

    pub fn ctx(&self) -> TickContext {
        self.ctx
    }

    pub fn planners(&self) -> &[Planner] {
        &self.planners
    }

    /// One tick: scripted changes, planners, then movement. Returns the trace
    /// events the planners emitted.
    pub fn step(&mut self) -> Vec<TraceEvent> {
        let tick = self.ctx.tick;
        let due = self.script.partition_point(|event| event.at <= tick);
        for event in self.script.drain(..due) {
            match event.agent {
                Some(agent) => self.world.apply(agent, &event.change),
                None => {
                    let agents: Vec<_> = self.world.agents().collect();
                    for agent in agents {
                        self.world.apply(agent, &event.change);
                    }
                }
            }
        }

        tick_planners(&self.ctx, &mut self.world, &mut self.planners);
        self.world.advance();
        self.ctx = self.ctx.next();

        self.trace.try_iter().collect()
    }

    pub fn run(&mut self, ticks: u64, mut on_event: impl FnMut(&TraceEvent)) {
        for _ in 0..ticks {
            for event in self.step() {
                on_event(&event);
            }
        }
    }

    pub fn report(&self) -> Vec<AgentReport> {
        self.planners
            .iter()
            .map(|planner| {
                let agent = planner.agent();
                let resources = self
                    .world
                    .body(agent)
                    .map(|body| {
                        body.status
                            .resources()
                            .map(|(key, _)| (key.to_string(), self.world.resource(agent, key)))
                            .collect()
                    })
                    .unwrap_or_default();
                AgentReport {
                    planner: planner.snapshot(),
                    resources,
                }
            })
            .collect()
    }
}
