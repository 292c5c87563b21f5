use brain_core::AgentId;
use brain_tools::TraceSink;

use crate::{ActionSpec, ConfigError, Goal, Planner, PlannerConfig, Registry, Result};

/// Collects registration data and validates it into a [`Planner`].
pub struct PlannerBuilder {
    agent: AgentId,
    config: PlannerConfig,
    actions: Vec<ActionSpec>,
    goals: Vec<Goal>,
    trace: Option<Box<dyn TraceSink>>,
}

impl PlannerBuilder {
    pub fn new(agent: AgentId) -> Self {
        Self {
            agent,
            config: PlannerConfig::default(),
            actions: Vec::new(),
            goals: Vec::new(),
            trace: None,
        }
    }

    pub fn config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn action(mut self, spec: ActionSpec) -> Self {
        self.actions.push(spec);
        self
    }

    pub fn actions(mut self, specs: impl IntoIterator<Item = ActionSpec>) -> Self {
        self.actions.extend(specs);
        self
    }

    pub fn goal(mut self, goal: Goal) -> Self {
        self.goals.push(goal);
        self
    }

    pub fn goals(mut self, goals: impl IntoIterator<Item = Goal>) -> Self {
        self.goals.extend(goals);
        self
    }

    pub fn trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    pub fn build(self) -> Result<Planner> {
        if self.config.max_cascade == 0 {
            return Err(ConfigError::ZeroCascadeLimit);
        }
        let registry = Registry::new(self.actions, self.goals)?;
        tracing::debug!(
            agent = %self.agent,
            actions = registry.actions().count(),
            goals = registry.goals().count(),
            "planner registered"
        );
        Ok(Planner::new(self.agent, self.config, registry, self.trace))
    }
}

impl Planner {
    pub fn builder(agent: AgentId) -> PlannerBuilder {
        PlannerBuilder::new(agent)
    }
}
