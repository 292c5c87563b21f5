//! Goal arbitration and staged action selection for autonomous agents.
//!
//! An agent registers a fixed set of [`Goal`]s (prioritized, each with a start
//! condition and an ordered list of action references) and [`ActionSpec`]s. The
//! [`Planner`] keeps one current goal and one current action and re-evaluates both
//! whenever status, sensors or the running action change.
//!
//! ```
//! use brain_core::{AgentBody, AgentId, TickContext};
//! use brain_planner::{ActionSpec, Condition, Goal, Planner};
//!
//! let mut body = AgentBody::new();
//! body.status.define("ore", 0.0, 3.0, 0.0);
//!
//! let mut planner = Planner::builder(AgentId(1))
//!     .action(ActionSpec::move_randomly("move_randomly"))
//!     .action(ActionSpec::go_to_beacon("go_to_deposit", "deposit"))
//!     .goal(
//!         Goal::new("hang_around", 2)
//!             .when(Condition::AtMax("ore".into()))
//!             .action("move_randomly", 1),
//!     )
//!     .goal(
//!         Goal::new("search", 1)
//!             .action("move_randomly", 1)
//!             .action("go_to_deposit", 2),
//!     )
//!     .build()
//!     .expect("valid registration");
//!
//! planner.tick(&TickContext::new(0, 0.1), &mut body);
//! assert_eq!(planner.goal().name(), "search");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod blueprint;
pub mod builder;
pub mod condition;
pub mod error;
pub mod events;
pub mod goal;
pub mod planner;
pub mod registry;

pub use action::{Action, ActionKind, ActionSpec, ActionState, Drain, ResourceDelta};
pub use blueprint::{Blueprint, GoalSpec};
pub use builder::PlannerBuilder;
pub use condition::Condition;
pub use error::{ConfigError, PlannerError, Result};
pub use events::{ActionChanged, ActionFinished, GoalChanged, Mailbox, Stimulus};
pub use goal::{Eligibility, Goal, GoalAction, GoalEntry, GoalStep, Predicate};
pub use planner::{tick_planners, Planner, PlannerConfig, PlannerSnapshot};
pub use registry::{ActionId, GoalId, Registry};
