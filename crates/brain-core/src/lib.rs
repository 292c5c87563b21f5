//! Engine-agnostic primitives for agent decision making.
//!
//! Nothing here decides anything. This crate defines how an agent perceives time
//! (`TickContext`), how it reads and affects its surroundings (`WorldView`,
//! `WorldMut`), and how collaborators announce changes (`EventChannel`).

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod body;
pub mod event;
pub mod rng;
pub mod sensor;
pub mod status;
pub mod tick;
pub mod world;

pub use agent::AgentId;
pub use body::AgentBody;
pub use event::{EventChannel, Subscription};
pub use rng::SplitMix64;
pub use sensor::{SensorChange, SensorChanged, SensorField};
pub use status::{ResourceLevel, StatusBank, StatusChanged};
pub use tick::TickContext;
pub use world::{BeaconType, ResourceKey, Steering, WorldMut, WorldView};
