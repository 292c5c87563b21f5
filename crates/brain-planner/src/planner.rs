//! The goal/action state machine.
//!
//! A planner always has one current goal and one current action. Three reactions
//! move it:
//!
//! - goal search: first eligible goal by priority (stable on ties);
//! - break check: within the current goal, switch to a later-stage eligible action
//!   when the running one allows interruption;
//! - finish: after consequences, re-select within the goal with no stage floor.
//!
//! Reactions are queued and run to a fixed point by one dispatcher. A reaction
//! raised while another is running is appended to the queue instead of recursing.

use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroU32;
use std::sync::mpsc::{self, Receiver};

use brain_core::{AgentId, EventChannel, TickContext, WorldMut, WorldView};
use brain_tools::{TraceEvent, TraceKind, TraceSink};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    Action, ActionChanged, ActionFinished, ActionId, ActionState, GoalChanged, GoalEntry, GoalId,
    Mailbox, PlannerError, Registry, Stimulus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Upper bound on reactions processed by one dispatch before the rest are dropped.
    pub max_cascade: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self { max_cascade: 64 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reaction {
    /// Something external changed: search goals, then check for a better action.
    Refresh,
    GoalChanged,
    ActionFinished,
}

/// Point-in-time view of a planner, for tooling and logs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PlannerSnapshot {
    pub agent: AgentId,
    pub goal: String,
    pub action: String,
    pub action_state: ActionState,
    pub action_elapsed_seconds: f32,
    pub activations: u64,
    pub fault: Option<String>,
}

/// Decision engine for one agent.
///
/// Dropping a planner is an abrupt teardown: the in-flight action is neither
/// broken nor finished.
pub struct Planner {
    agent: AgentId,
    config: PlannerConfig,
    registry: Registry,
    current_goal: GoalId,
    current_action: ActionId,
    started: bool,
    dispatching: bool,
    pending: VecDeque<Reaction>,
    mailbox: Mailbox,
    inbox: Receiver<Stimulus>,
    fault: Option<PlannerError>,
    /// Set by `report`; reset at the start of every dispatch.
    fault_raised: bool,
    goal_changed: EventChannel<GoalChanged>,
    action_changed: EventChannel<ActionChanged>,
    action_finished: EventChannel<ActionFinished>,
    trace: Option<Box<dyn TraceSink>>,
}

impl Planner {
    /// Bootstrap state is the first registered goal and the first registered
    /// action; no selection runs until [`Planner::start`].
    pub(crate) fn new(
        agent: AgentId,
        config: PlannerConfig,
        registry: Registry,
        trace: Option<Box<dyn TraceSink>>,
    ) -> Self {
        let (tx, inbox) = mpsc::channel();
        Self {
            agent,
            config,
            registry,
            current_goal: GoalId(0),
            current_action: ActionId(0),
            started: false,
            dispatching: false,
            pending: VecDeque::new(),
            mailbox: Mailbox { tx },
            inbox,
            fault: None,
            fault_raised: false,
            goal_changed: EventChannel::new(),
            action_changed: EventChannel::new(),
            action_finished: EventChannel::new(),
            trace,
        }
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn config(&self) -> PlannerConfig {
        self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn current_goal(&self) -> GoalId {
        self.current_goal
    }

    pub fn current_action(&self) -> ActionId {
        self.current_action
    }

    pub fn goal(&self) -> &GoalEntry {
        self.registry.goal(self.current_goal)
    }

    pub fn action(&self) -> &Action {
        self.registry.action(self.current_action)
    }

    pub fn action_state(&self) -> ActionState {
        self.action().state()
    }

    /// The configuration fault the planner is currently stuck on, if any.
    pub fn fault(&self) -> Option<&PlannerError> {
        self.fault.as_ref()
    }

    pub fn mailbox(&self) -> Mailbox {
        self.mailbox.clone()
    }

    pub fn on_goal_changed(&mut self) -> &mut EventChannel<GoalChanged> {
        &mut self.goal_changed
    }

    pub fn on_action_changed(&mut self) -> &mut EventChannel<ActionChanged> {
        &mut self.action_changed
    }

    pub fn on_action_finished(&mut self) -> &mut EventChannel<ActionFinished> {
        &mut self.action_finished
    }

    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.trace = Some(sink);
    }

    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.trace.take()
    }

    pub fn snapshot(&self) -> PlannerSnapshot {
        let action = self.action();
        PlannerSnapshot {
            agent: self.agent,
            goal: self.goal().name().to_string(),
            action: action.name().to_string(),
            action_state: action.state(),
            action_elapsed_seconds: action.elapsed(),
            activations: action.activations(),
            fault: self.fault.as_ref().map(ToString::to_string),
        }
    }

    /// Activate the bootstrap action, then run a first goal search and break check.
    /// Idempotent.
    pub fn start<W: WorldMut>(&mut self, ctx: &TickContext, world: &mut W) {
        if self.started {
            return;
        }
        self.started = true;

        tracing::debug!(
            agent = %self.agent,
            goal = self.goal().name(),
            action = self.action().name(),
            "planner started"
        );
        self.activate(ctx, self.current_action, world);
        self.dispatch(Reaction::Refresh, ctx, world);
    }

    /// Deliver a stimulus synchronously; all resulting switches happen before return.
    pub fn notify<W: WorldMut>(&mut self, stimulus: Stimulus, ctx: &TickContext, world: &mut W) {
        tracing::trace!(agent = %self.agent, ?stimulus, "stimulus");
        if !self.started {
            self.start(ctx, world);
        }
        self.dispatch(Reaction::Refresh, ctx, world);
    }

    /// Process stimuli queued through the [`Mailbox`].
    pub fn pump<W: WorldMut>(&mut self, ctx: &TickContext, world: &mut W) {
        if !self.started {
            self.start(ctx, world);
        }
        self.run_to_fixed_point(ctx, world);
    }

    /// One simulation step: pending stimuli, then `update` on the running action,
    /// then finish handling if it completed.
    pub fn tick<W: WorldMut>(&mut self, ctx: &TickContext, world: &mut W) {
        self.pump(ctx, world);

        let agent = self.agent;
        let id = self.current_action;
        let action = self.registry.action_mut(id);
        if !action.is_running() {
            return;
        }

        action.update(ctx, agent, world);
        if !action.is_finished(agent, &*world) {
            self.pump(ctx, world);
            return;
        }

        if let Err(err) = action.execute_consequences(ctx, agent, world) {
            self.report(ctx, err);
            return;
        }

        let name = self.action().name().to_string();
        tracing::debug!(agent = %agent, tick = ctx.tick, action = %name, "action finished");
        self.emit(ctx, TraceKind::ActionFinished);
        self.action_finished.publish(&ActionFinished {
            agent,
            tick: ctx.tick,
            action: id,
            name,
        });

        self.dispatch(Reaction::ActionFinished, ctx, world);
    }

    fn dispatch<W: WorldMut>(&mut self, reaction: Reaction, ctx: &TickContext, world: &mut W) {
        self.pending.push_back(reaction);
        self.run_to_fixed_point(ctx, world);
    }

    fn run_to_fixed_point<W: WorldMut>(&mut self, ctx: &TickContext, world: &mut W) {
        if self.dispatching {
            return;
        }
        self.dispatching = true;
        self.fault_raised = false;

        let mut passes = 0u32;
        let mut truncated = false;
        while let Some(reaction) = self.next_reaction() {
            if passes == self.config.max_cascade {
                self.pending.clear();
                while self.inbox.try_recv().is_ok() {}
                tracing::warn!(
                    agent = %self.agent,
                    passes,
                    "reaction cascade truncated"
                );
                self.emit(ctx, TraceKind::CascadeLimited);
                self.fault = Some(PlannerError::CascadeLimit { passes });
                truncated = true;
                break;
            }
            passes += 1;
            self.react(reaction, ctx, world);
        }

        // Settled cleanly: faults left over from an earlier pass no longer hold.
        if passes > 0 && !truncated && !self.fault_raised {
            self.clear_fault(|f| {
                matches!(
                    f,
                    PlannerError::CascadeLimit { .. }
                        | PlannerError::ReentrantExecute { .. }
                        | PlannerError::NotRunning { .. }
                )
            });
        }

        self.dispatching = false;
    }

    fn next_reaction(&mut self) -> Option<Reaction> {
        if let Some(reaction) = self.pending.pop_front() {
            return Some(reaction);
        }
        // Any number of queued external stimuli collapse into one refresh: both
        // reactions re-read the world from scratch.
        self.inbox.try_recv().ok()?;
        while self.inbox.try_recv().is_ok() {}
        Some(Reaction::Refresh)
    }

    fn react<W: WorldMut>(&mut self, reaction: Reaction, ctx: &TickContext, world: &mut W) {
        match reaction {
            Reaction::Refresh => {
                // A goal switch queues its own break check.
                if !self.search_goal(ctx, &*world) {
                    self.break_check(ctx, world);
                }
            }
            Reaction::GoalChanged => self.break_check(ctx, world),
            Reaction::ActionFinished => {
                self.search_goal(ctx, &*world);
                self.break_check(ctx, world);
            }
        }
    }

    /// Returns `true` if the current goal changed.
    fn search_goal<W: WorldView>(&mut self, ctx: &TickContext, world: &W) -> bool {
        let agent = self.agent;
        let view: &dyn WorldView = world;
        let selected = self
            .registry
            .ranked_goals()
            .iter()
            .copied()
            .find(|&id| self.registry.goal(id).can_start(agent, view));

        let Some(goal) = selected else {
            self.report(ctx, PlannerError::NoEligibleGoal);
            return false;
        };
        self.clear_fault(|f| matches!(f, PlannerError::NoEligibleGoal));
        if goal == self.current_goal {
            return false;
        }

        let previous = std::mem::replace(&mut self.current_goal, goal);
        let name = self.goal().name().to_string();
        tracing::debug!(
            agent = %agent,
            tick = ctx.tick,
            from = self.registry.goal(previous).name(),
            goal = %name,
            "goal changed"
        );
        self.emit(ctx, TraceKind::GoalSelected);
        self.goal_changed.publish(&GoalChanged {
            agent,
            tick: ctx.tick,
            previous,
            goal,
            name,
        });
        self.pending.push_back(Reaction::GoalChanged);
        true
    }

    fn break_check<W: WorldMut>(&mut self, ctx: &TickContext, world: &mut W) {
        let current = self.action();
        if current.is_running() {
            if !current.can_break() {
                tracing::trace!(
                    agent = %self.agent,
                    action = current.name(),
                    "running action is not interruptible"
                );
                return;
            }
            if let Some(next) = self.suitable_action(ctx, &*world, false) {
                self.switch_to(next, ctx, world);
            }
        } else if let Some(next) = self.suitable_action(ctx, &*world, true) {
            // Finished (or never activated): no stage floor, restarts allowed.
            self.switch_to(next, ctx, world);
        }
    }

    /// Highest-order eligible action of the current goal, if it should replace the
    /// current action. Unforced, it never moves to a lower order than the current
    /// action's order in this goal (0 when the goal does not list it).
    fn suitable_action<W: WorldView>(
        &mut self,
        ctx: &TickContext,
        world: &W,
        forced: bool,
    ) -> Option<ActionId> {
        let agent = self.agent;
        let goal = self.registry.goal(self.current_goal);
        let candidate = goal
            .steps()
            .iter()
            .find(|step| self.registry.action(step.action).can_start(agent, world))
            .copied();
        let current_order = goal
            .order_of(self.current_action)
            .map_or(0, NonZeroU32::get);

        let Some(candidate) = candidate else {
            let goal = goal.name().to_string();
            self.report(ctx, PlannerError::NoEligibleAction { goal });
            return None;
        };
        self.clear_fault(|f| matches!(f, PlannerError::NoEligibleAction { .. }));

        if forced {
            return Some(candidate.action);
        }
        if candidate.action == self.current_action || candidate.order.get() < current_order {
            return None;
        }
        Some(candidate.action)
    }

    fn switch_to<W: WorldMut>(&mut self, next: ActionId, ctx: &TickContext, world: &mut W) {
        let agent = self.agent;
        let previous = self.current_action;

        if self.registry.action(previous).is_running() {
            if let Err(err) = self
                .registry
                .action_mut(previous)
                .execute_break(ctx, agent, world)
            {
                self.report(ctx, err);
                return;
            }
            tracing::debug!(
                agent = %agent,
                tick = ctx.tick,
                action = self.registry.action(previous).name(),
                "action broken"
            );
            self.emit(ctx, TraceKind::ActionBroken);
        }

        self.current_action = next;
        if !self.activate(ctx, next, world) {
            return;
        }

        let name = self.action().name().to_string();
        tracing::debug!(
            agent = %agent,
            tick = ctx.tick,
            goal = self.goal().name(),
            action = %name,
            "action started"
        );
        if next != previous {
            self.action_changed.publish(&ActionChanged {
                agent,
                tick: ctx.tick,
                previous,
                action: next,
                name,
            });
        }
    }

    fn activate<W: WorldMut>(&mut self, ctx: &TickContext, id: ActionId, world: &mut W) -> bool {
        let agent = self.agent;
        match self.registry.action_mut(id).execute(ctx, agent, world) {
            Ok(()) => {
                self.emit(ctx, TraceKind::ActionStarted);
                true
            }
            Err(err) => {
                self.report(ctx, err);
                false
            }
        }
    }

    /// Record a fault. Logged and traced once per distinct fault, not on every retry.
    fn report(&mut self, ctx: &TickContext, error: PlannerError) {
        self.fault_raised = true;
        if self.fault.as_ref() == Some(&error) {
            return;
        }
        tracing::error!(
            agent = %self.agent,
            tick = ctx.tick,
            goal = self.goal().name(),
            action = self.action().name(),
            %error,
            "planner configuration fault; keeping last valid state"
        );
        self.emit(ctx, TraceKind::SelectionFailed);
        self.fault = Some(error);
    }

    fn clear_fault(&mut self, resolved: impl Fn(&PlannerError) -> bool) {
        if self.fault.as_ref().is_some_and(resolved) {
            tracing::info!(agent = %self.agent, "planner fault resolved");
            self.fault = None;
        }
    }

    fn emit(&mut self, ctx: &TickContext, kind: TraceKind) {
        let Some(sink) = self.trace.as_mut() else {
            return;
        };
        sink.emit(
            TraceEvent::new(ctx.tick, self.agent, kind)
                .with_goal(self.registry.goal(self.current_goal).name())
                .with_action(self.registry.action(self.current_action).name()),
        );
    }
}

impl fmt::Debug for Planner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field("agent", &self.agent)
            .field("goal", &self.goal().name())
            .field("action", &self.action().name())
            .field("state", &self.action_state())
            .field("fault", &self.fault)
            .finish_non_exhaustive()
    }
}

/// Tick several planners against one shared world in stable agent order.
///
/// Sorts `planners` by agent id in place, so the slice stays in that order
/// after the call.
pub fn tick_planners<W: WorldMut>(ctx: &TickContext, world: &mut W, planners: &mut [Planner]) {
    planners.sort_by_key(Planner::agent);
    for planner in planners.iter_mut() {
        planner.tick(ctx, world);
    }
}
