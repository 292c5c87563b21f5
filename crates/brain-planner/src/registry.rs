use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::num::NonZeroU32;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Action, ActionSpec, ConfigError, Goal, GoalEntry, GoalStep};

/// Stable handle to a registered goal (registration index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GoalId(pub(crate) u32);

/// Stable handle to a registered action (registration index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionId(pub(crate) u32);

impl GoalId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl ActionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "goal#{}", self.0)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action#{}", self.0)
    }
}

/// The immutable set of goals and actions an agent can choose from.
///
/// Built once; every goal-to-action reference is resolved to a handle here so
/// lookups during selection cannot miss. Action instances keep their own mutable
/// progress, but membership never changes.
#[derive(Debug)]
pub struct Registry {
    actions: Vec<Action>,
    goals: Vec<GoalEntry>,
    action_index: BTreeMap<String, ActionId>,
    goal_index: BTreeMap<String, GoalId>,
    ranking: Vec<GoalId>,
}

impl Registry {
    pub fn new(actions: Vec<ActionSpec>, goals: Vec<Goal>) -> Result<Self, ConfigError> {
        if actions.is_empty() {
            return Err(ConfigError::NoActions);
        }
        if goals.is_empty() {
            return Err(ConfigError::NoGoals);
        }

        let mut action_index = BTreeMap::new();
        let mut registered = Vec::with_capacity(actions.len());
        for (i, spec) in actions.into_iter().enumerate() {
            spec.validate()?;
            if action_index
                .insert(spec.name.clone(), ActionId(i as u32))
                .is_some()
            {
                return Err(ConfigError::DuplicateAction(spec.name));
            }
            registered.push(Action::new(spec));
        }

        let mut goal_index = BTreeMap::new();
        let mut entries = Vec::with_capacity(goals.len());
        for (i, goal) in goals.into_iter().enumerate() {
            if goal_index
                .insert(goal.name.clone(), GoalId(i as u32))
                .is_some()
            {
                return Err(ConfigError::DuplicateGoal(goal.name));
            }
            let steps = resolve_steps(&goal, &action_index)?;
            entries.push(GoalEntry::new(
                goal.name,
                goal.priority,
                steps,
                goal.eligibility,
            ));
        }

        // Stable: equal priorities keep registration order.
        let mut ranking: Vec<GoalId> = (0..entries.len() as u32).map(GoalId).collect();
        ranking.sort_by(|a, b| entries[b.index()].priority().cmp(&entries[a.index()].priority()));

        if !entries.iter().any(|g| g.eligibility().is_unconditional()) {
            tracing::warn!(
                "no goal is unconditionally eligible; selection fails if every goal condition is false"
            );
        }

        Ok(Self {
            actions: registered,
            goals: entries,
            action_index,
            goal_index,
            ranking,
        })
    }

    pub fn action(&self, id: ActionId) -> &Action {
        &self.actions[id.index()]
    }

    pub(crate) fn action_mut(&mut self, id: ActionId) -> &mut Action {
        &mut self.actions[id.index()]
    }

    pub fn goal(&self, id: GoalId) -> &GoalEntry {
        &self.goals[id.index()]
    }

    pub fn action_id(&self, name: &str) -> Option<ActionId> {
        self.action_index.get(name).copied()
    }

    pub fn goal_id(&self, name: &str) -> Option<GoalId> {
        self.goal_index.get(name).copied()
    }

    /// Goals by priority, highest first; ties in registration order.
    pub fn ranked_goals(&self) -> &[GoalId] {
        &self.ranking
    }

    pub fn actions(&self) -> impl Iterator<Item = (ActionId, &Action)> {
        self.actions
            .iter()
            .enumerate()
            .map(|(i, a)| (ActionId(i as u32), a))
    }

    pub fn goals(&self) -> impl Iterator<Item = (GoalId, &GoalEntry)> {
        self.goals
            .iter()
            .enumerate()
            .map(|(i, g)| (GoalId(i as u32), g))
    }
}

fn resolve_steps(
    goal: &Goal,
    action_index: &BTreeMap<String, ActionId>,
) -> Result<Vec<GoalStep>, ConfigError> {
    if goal.actions.is_empty() {
        return Err(ConfigError::EmptyGoal(goal.name.clone()));
    }

    let mut seen_actions = BTreeSet::new();
    let mut seen_orders = BTreeSet::new();
    let mut steps = Vec::with_capacity(goal.actions.len());

    for entry in &goal.actions {
        let Some(&action) = action_index.get(&entry.action) else {
            return Err(ConfigError::UnknownAction {
                goal: goal.name.clone(),
                action: entry.action.clone(),
            });
        };
        let Some(order) = NonZeroU32::new(entry.order) else {
            return Err(ConfigError::InvalidOrder {
                goal: goal.name.clone(),
                action: entry.action.clone(),
            });
        };
        if !seen_actions.insert(action) {
            return Err(ConfigError::DuplicateGoalAction {
                goal: goal.name.clone(),
                action: entry.action.clone(),
            });
        }
        if !seen_orders.insert(order) {
            return Err(ConfigError::DuplicateOrder {
                goal: goal.name.clone(),
                order: order.get(),
            });
        }
        steps.push(GoalStep { action, order });
    }
    Ok(steps)
}
