use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

use brain_core::{AgentId, WorldView};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ActionId, Condition};

pub type Predicate = Arc<dyn Fn(AgentId, &dyn WorldView) -> bool + Send + Sync>;

/// How a goal decides whether it may start.
#[derive(Clone)]
pub enum Eligibility {
    When(Condition),
    /// Arbitrary code predicate. Must be pure: it runs for every goal on every search.
    Predicate(Predicate),
}

impl Eligibility {
    pub fn evaluate(&self, agent: AgentId, world: &dyn WorldView) -> bool {
        match self {
            Eligibility::When(condition) => condition.evaluate(agent, world),
            Eligibility::Predicate(predicate) => predicate(agent, world),
        }
    }

    pub fn is_unconditional(&self) -> bool {
        match self {
            Eligibility::When(condition) => condition.is_unconditional(),
            Eligibility::Predicate(_) => false,
        }
    }
}

impl fmt::Debug for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eligibility::When(condition) => f.debug_tuple("When").field(condition).finish(),
            Eligibility::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Binds an action (by name) to a goal at an order rank.
///
/// Higher orders are later stages of the goal. The same action may appear in
/// several goals at different orders.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GoalAction {
    pub action: String,
    pub order: u32,
}

/// Registration form of a goal.
#[derive(Debug, Clone)]
pub struct Goal {
    pub name: String,
    pub priority: i32,
    pub actions: Vec<GoalAction>,
    pub eligibility: Eligibility,
}

impl Goal {
    /// A goal that is always eligible until `when`/`when_fn` says otherwise.
    pub fn new(name: impl Into<String>, priority: i32) -> Self {
        Self {
            name: name.into(),
            priority,
            actions: Vec::new(),
            eligibility: Eligibility::When(Condition::Always),
        }
    }

    pub fn action(mut self, action: impl Into<String>, order: u32) -> Self {
        self.actions.push(GoalAction {
            action: action.into(),
            order,
        });
        self
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.eligibility = Eligibility::When(condition);
        self
    }

    pub fn when_fn(
        mut self,
        predicate: impl Fn(AgentId, &dyn WorldView) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.eligibility = Eligibility::Predicate(Arc::new(predicate));
        self
    }
}

/// A registered action reference inside a goal, resolved to its handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalStep {
    pub action: ActionId,
    pub order: NonZeroU32,
}

/// A validated goal. Steps are kept sorted by order, highest first.
#[derive(Debug, Clone)]
pub struct GoalEntry {
    name: String,
    priority: i32,
    steps: Vec<GoalStep>,
    eligibility: Eligibility,
}

impl GoalEntry {
    pub(crate) fn new(
        name: String,
        priority: i32,
        mut steps: Vec<GoalStep>,
        eligibility: Eligibility,
    ) -> Self {
        steps.sort_by(|a, b| b.order.cmp(&a.order));
        Self {
            name,
            priority,
            steps,
            eligibility,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn steps(&self) -> &[GoalStep] {
        &self.steps
    }

    pub fn eligibility(&self) -> &Eligibility {
        &self.eligibility
    }

    pub fn can_start(&self, agent: AgentId, world: &dyn WorldView) -> bool {
        self.eligibility.evaluate(agent, world)
    }

    /// Order rank of `action` within this goal, if listed.
    pub fn order_of(&self, action: ActionId) -> Option<NonZeroU32> {
        self.steps
            .iter()
            .find(|s| s.action == action)
            .map(|s| s.order)
    }
}
