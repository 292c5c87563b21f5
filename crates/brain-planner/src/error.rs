use thiserror::Error;

/// Registration-time errors. Building a planner fails fast on any of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no goals registered")]
    NoGoals,

    #[error("no actions registered")]
    NoActions,

    #[error("goal `{0}` registered twice")]
    DuplicateGoal(String),

    #[error("action `{0}` registered twice")]
    DuplicateAction(String),

    #[error("goal `{goal}` references unregistered action `{action}`")]
    UnknownAction { goal: String, action: String },

    #[error("goal `{0}` lists no actions")]
    EmptyGoal(String),

    #[error("goal `{goal}` gives action `{action}` order 0; orders start at 1")]
    InvalidOrder { goal: String, action: String },

    #[error("goal `{goal}` lists action `{action}` more than once")]
    DuplicateGoalAction { goal: String, action: String },

    #[error("goal `{goal}` uses order {order} for more than one action")]
    DuplicateOrder { goal: String, order: u32 },

    #[error("action `{action}`: {reason}")]
    InvalidActionParameter { action: String, reason: String },

    #[error("max_cascade must be at least 1")]
    ZeroCascadeLimit,
}

/// Runtime selection faults.
///
/// These never escape `tick`/`notify`. The planner logs them, keeps its last valid
/// goal and action, and exposes the fault through `Planner::fault`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    #[error("no goal is eligible to start; register an unconditional fallback goal")]
    NoEligibleGoal,

    #[error("goal `{goal}` has no eligible action")]
    NoEligibleAction { goal: String },

    #[error("action `{action}` is already running")]
    ReentrantExecute { action: String },

    #[error("action `{action}` is not running")]
    NotRunning { action: String },

    #[error("reaction cascade exceeded {passes} passes")]
    CascadeLimit { passes: u32 },
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
