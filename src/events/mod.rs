//! Engine events.
//!
//! The state machine commits every transition before it says anything
//! about it. Presentation, statistics and persistence layers subscribe
//! through an [`EventSink`] handed to the machine at construction and
//! replay the already-final transition however they like.
//!
//! ## Sinks
//!
//! - `EventLog`: Keeps every event in memory (tests, replays)
//! - `ChannelSink`: Forwards events over an `mpsc` channel to another task
//! - `NullSink`: Drops everything

use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};

use crate::history::MoveRecord;
use crate::scoring::ScoreSnapshot;

/// Something the engine has committed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A player move was applied.
    MoveCommitted(MoveRecord),
    /// An automatic follow-on effect was applied.
    CascadeCommitted(MoveRecord),
    /// A record was reverted by undo.
    MoveUndone(MoveRecord),
    /// The round was won.
    GameWon { score: ScoreSnapshot, moves: u32 },
    /// No further progress is possible.
    GameLost,
}

/// Event subscriber.
///
/// Every hook has a default that forwards to [`EventSink::on_event`], so a
/// sink may either implement the hooks it cares about or take everything
/// through one method.
pub trait EventSink {
    /// Catch-all for every event.
    fn on_event(&mut self, _event: EngineEvent) {}

    fn on_move_committed(&mut self, record: &MoveRecord) {
        self.on_event(EngineEvent::MoveCommitted(record.clone()));
    }

    fn on_cascade_committed(&mut self, record: &MoveRecord) {
        self.on_event(EngineEvent::CascadeCommitted(record.clone()));
    }

    fn on_move_undone(&mut self, record: &MoveRecord) {
        self.on_event(EngineEvent::MoveUndone(record.clone()));
    }

    fn on_game_won(&mut self, score: ScoreSnapshot, moves: u32) {
        self.on_event(EngineEvent::GameWon { score, moves });
    }

    fn on_game_lost(&mut self) {
        self.on_event(EngineEvent::GameLost);
    }
}

/// Drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {}

/// Collects events in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<EngineEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Take the events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for EventLog {
    fn on_event(&mut self, event: EngineEvent) {
        self.events.push(event);
    }
}

/// Forwards events to a receiver, typically a presentation task.
///
/// A disconnected receiver is not an engine error; events are dropped.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    sender: Sender<EngineEvent>,
}

impl ChannelSink {
    #[must_use]
    pub fn new(sender: Sender<EngineEvent>) -> Self {
        Self { sender }
    }

    /// Create a sink together with its receiving end.
    #[must_use]
    pub fn channel() -> (Self, Receiver<EngineEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self::new(sender), receiver)
    }
}

impl EventSink for ChannelSink {
    fn on_event(&mut self, event: EngineEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("event receiver dropped");
        }
    }
}
