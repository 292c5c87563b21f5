//! Tooling primitives for inspecting agent decisions.
//!
//! Planners emit [`TraceEvent`]s into a [`TraceSink`]; tooling records or renders
//! them afterwards. Kept free of engine types so traces can be replayed offline.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{NullTraceSink, TraceEvent, TraceKind, TraceLog, TraceSink, VecTraceSink};
