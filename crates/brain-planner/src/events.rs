//! Notifications into and out of the planner.

use std::sync::mpsc::Sender;

use brain_core::{AgentId, EventChannel, SensorChanged, StatusChanged, Subscription};

use crate::{ActionId, GoalId};

/// External change that may alter which goal or action is suitable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stimulus {
    StatusChanged,
    SensorChanged,
}

/// Clonable handle for queueing stimuli to one planner.
///
/// Subscribe it to collaborator channels with [`Mailbox::watch_status`] and
/// [`Mailbox::watch_sensors`]. Queued stimuli are processed the next time the
/// planner pumps, ticks or is notified, on the planner's own thread.
#[derive(Debug, Clone)]
pub struct Mailbox {
    pub(crate) tx: Sender<Stimulus>,
}

impl Mailbox {
    pub fn post(&self, stimulus: Stimulus) {
        // The receiver lives in the planner; a send error means it was torn down.
        let _ = self.tx.send(stimulus);
    }

    pub fn watch_status(&self, channel: &mut EventChannel<StatusChanged>) -> Subscription {
        let mailbox = self.clone();
        channel.subscribe(move |_| mailbox.post(Stimulus::StatusChanged))
    }

    pub fn watch_sensors(&self, channel: &mut EventChannel<SensorChanged>) -> Subscription {
        let mailbox = self.clone();
        channel.subscribe(move |_| mailbox.post(Stimulus::SensorChanged))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalChanged {
    pub agent: AgentId,
    pub tick: u64,
    pub previous: GoalId,
    pub goal: GoalId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionChanged {
    pub agent: AgentId,
    pub tick: u64,
    pub previous: ActionId,
    pub action: ActionId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFinished {
    pub agent: AgentId,
    pub tick: u64,
    pub action: ActionId,
    pub name: String,
}
