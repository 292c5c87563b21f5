use brain_core::AgentId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ActionSpec, Condition, Eligibility, Goal, GoalAction, Planner, PlannerBuilder, Result};

/// Data form of a goal, for loading from configuration files.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GoalSpec {
    pub name: String,
    pub priority: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub when: Condition,
    pub actions: Vec<GoalAction>,
}

impl From<GoalSpec> for Goal {
    fn from(spec: GoalSpec) -> Self {
        Goal {
            name: spec.name,
            priority: spec.priority,
            actions: spec.actions,
            eligibility: Eligibility::When(spec.when),
        }
    }
}

/// Everything an agent may choose from: its actions and goals, in registration order.
///
/// Registration order matters twice: the first goal and first action are the
/// bootstrap state, and equal-priority goals are ranked in this order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Blueprint {
    pub actions: Vec<ActionSpec>,
    pub goals: Vec<GoalSpec>,
}

impl Blueprint {
    pub fn into_builder(self, agent: AgentId) -> PlannerBuilder {
        PlannerBuilder::new(agent)
            .actions(self.actions)
            .goals(self.goals.into_iter().map(Goal::from))
    }
}

impl Planner {
    pub fn from_blueprint(agent: AgentId, blueprint: Blueprint) -> Result<Self> {
        blueprint.into_builder(agent).build()
    }
}
