#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use brain_core::{AgentBody, AgentId, BeaconType, ResourceKey, TickContext};
use brain_planner::{
    ActionChanged, ActionSpec, Condition, Drain, Goal, GoalChanged, Planner, PlannerBuilder,
    ResourceDelta,
};
use brain_tools::{TraceEvent, TraceKind, TraceLog, TraceSink};

pub const ORE: ResourceKey = ResourceKey::from_static("ore");
pub const STAMINA: ResourceKey = ResourceKey::from_static("stamina");
pub const DEPOSIT: BeaconType = BeaconType::from_static("deposit");
pub const REST: BeaconType = BeaconType::from_static("rest");
pub const DAMAGE: BeaconType = BeaconType::from_static("damage");

pub fn mine_deposit() -> ActionSpec {
    ActionSpec::interact("mine_deposit", DEPOSIT, 3.0)
        .draining(Drain::new(STAMINA, 2.0))
        .on_finish(ResourceDelta::new(ORE, 1.0))
        .consuming_target()
}

pub fn miner_actions() -> Vec<ActionSpec> {
    vec![
        ActionSpec::move_randomly("move_randomly"),
        ActionSpec::go_to_beacon("go_to_deposit", DEPOSIT),
        mine_deposit(),
        ActionSpec::go_to_beacon("go_to_rest", REST),
        ActionSpec::interact("rest", REST, 2.0).on_finish(ResourceDelta::new(STAMINA, 10.0)),
        ActionSpec::move_randomly("panic"),
    ]
}

pub fn miner_goals() -> Vec<Goal> {
    vec![
        Goal::new("search", 1)
            .action("move_randomly", 1)
            .action("go_to_deposit", 2)
            .action("mine_deposit", 3),
        Goal::new("hang_around", 2)
            .when(Condition::AtMax(ORE))
            .action("move_randomly", 1),
        Goal::new("keep_stamina", 5)
            .when(Condition::BelowFraction {
                resource: STAMINA,
                fraction: 0.3,
            })
            .action("move_randomly", 1)
            .action("go_to_rest", 2)
            .action("rest", 3),
        Goal::new("die", 10)
            .when(Condition::Sensible(DAMAGE))
            .action("panic", 1),
    ]
}

pub fn miner_body(ore: f32, stamina: f32) -> AgentBody {
    let mut body = AgentBody::new();
    body.status.define(ORE, 0.0, 3.0, ore);
    body.status.define(STAMINA, 0.0, 10.0, stamina);
    body
}

/// Trace sink whose log stays readable after the planner takes ownership of it.
#[derive(Clone, Default)]
pub struct SharedLog(pub Arc<Mutex<TraceLog>>);

impl TraceSink for SharedLog {
    fn emit(&mut self, event: TraceEvent) {
        self.0.lock().unwrap().push(event);
    }
}

pub struct Rig {
    pub planner: Planner,
    pub body: AgentBody,
    pub ctx: TickContext,
    pub trace: Arc<Mutex<TraceLog>>,
    pub goal_changes: Arc<Mutex<Vec<GoalChanged>>>,
    pub action_changes: Arc<Mutex<Vec<ActionChanged>>>,
}

impl Rig {
    pub fn new(builder: PlannerBuilder, mut body: AgentBody, dt: f32) -> Self {
        let log = SharedLog::default();
        let trace = log.0.clone();
        let mut planner = builder
            .trace_sink(Box::new(log))
            .build()
            .expect("valid registration");

        let mailbox = planner.mailbox();
        mailbox.watch_status(body.status.on_changed());
        mailbox.watch_sensors(body.sensors.on_changed());

        let goal_changes = Arc::new(Mutex::new(Vec::new()));
        let sink = goal_changes.clone();
        planner
            .on_goal_changed()
            .subscribe(move |e: &GoalChanged| sink.lock().unwrap().push(e.clone()));

        let action_changes = Arc::new(Mutex::new(Vec::new()));
        let sink = action_changes.clone();
        planner
            .on_action_changed()
            .subscribe(move |e: &ActionChanged| sink.lock().unwrap().push(e.clone()));

        Self {
            planner,
            body,
            ctx: TickContext::new(0, dt).with_seed(7),
            trace,
            goal_changes,
            action_changes,
        }
    }

    pub fn miner(ore: f32, stamina: f32) -> Self {
        let builder = Planner::builder(AgentId(1))
            .actions(miner_actions())
            .goals(miner_goals());
        Self::new(builder, miner_body(ore, stamina), 0.5)
    }

    pub fn start(&mut self) {
        self.planner.start(&self.ctx, &mut self.body);
    }

    /// Deliver whatever the collaborators queued since the last call.
    pub fn pump(&mut self) {
        self.planner.pump(&self.ctx, &mut self.body);
    }

    pub fn step(&mut self) {
        self.planner.tick(&self.ctx, &mut self.body);
        self.ctx = self.ctx.next();
    }

    pub fn steps(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    pub fn goal(&self) -> &str {
        self.planner.goal().name()
    }

    pub fn action(&self) -> &str {
        self.planner.action().name()
    }

    pub fn resource(&self, resource: &ResourceKey) -> f32 {
        self.body.status.value(resource).unwrap()
    }

    pub fn count(&self, kind: TraceKind) -> usize {
        self.trace.lock().unwrap().count(kind)
    }

    pub fn actions_of(&self, kind: TraceKind) -> Vec<String> {
        self.trace
            .lock()
            .unwrap()
            .of_kind(kind)
            .map(|e| e.action.clone())
            .collect()
    }

    pub fn action_change_names(&self) -> Vec<String> {
        self.action_changes
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }

    pub fn goal_change_names(&self) -> Vec<String> {
        self.goal_changes
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }
}
