use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use brain_core::AgentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TraceKind {
    GoalSelected,
    ActionStarted,
    ActionFinished,
    ActionBroken,
    SelectionFailed,
    CascadeLimited,
}

impl TraceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TraceKind::GoalSelected => "goal.selected",
            TraceKind::ActionStarted => "action.started",
            TraceKind::ActionFinished => "action.finished",
            TraceKind::ActionBroken => "action.broken",
            TraceKind::SelectionFailed => "selection.failed",
            TraceKind::CascadeLimited => "cascade.limited",
        }
    }
}

/// One planner decision, recorded as plain data.
///
/// `goal` and `action` are the planner's current goal and action names when the
/// event was emitted: the newly selected one for selections and starts, the one
/// ending for finishes and breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub agent: AgentId,
    pub kind: TraceKind,
    pub goal: String,
    pub action: String,
}

impl TraceEvent {
    pub fn new(tick: u64, agent: AgentId, kind: TraceKind) -> Self {
        Self {
            tick,
            agent,
            kind,
            goal: String::new(),
            action: String::new(),
        }
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:>6}] {} {:<16} goal={} action={}",
            self.tick,
            self.agent,
            self.kind.as_str(),
            self.goal,
            self.action
        )
    }
}

pub trait TraceSink: Send {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn count(&self, kind: TraceKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn of_kind(&self, kind: TraceKind) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn last(&self) -> Option<&TraceEvent> {
        self.events.last()
    }
}

impl TraceSink for TraceLog {
    fn emit(&mut self, event: TraceEvent) {
        self.push(event);
    }
}
