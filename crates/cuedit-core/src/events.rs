//! Event Broadcasting
//!
//! Bridges the synchronous listener list onto a `tokio` broadcast
//! channel. Sending never blocks: without receivers the event is
//! dropped, and a slow receiver lags instead of stalling the editor.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use cuedit_lib::core::{
    commands::StateChange,
    cues::CueStore,
    sync::{StoreChanged, StoreListener},
    CueIndex, OpId,
};

/// Default channel capacity
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Serializable snapshot of one store change
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreChangedEvent {
    pub op_id: OpId,
    pub command: String,
    pub changes: Vec<StateChange>,
    /// Cue count after the change
    pub cue_count: usize,
    /// Selection after the change
    pub selected: Option<CueIndex>,
}

impl StoreChangedEvent {
    pub fn new(event: &StoreChanged, store: &CueStore) -> Self {
        Self {
            op_id: event.op_id.clone(),
            command: event.command.clone(),
            changes: event.changes.clone(),
            cue_count: store.len(),
            selected: store.selected_index(),
        }
    }
}

/// Listener that forwards every change onto a broadcast channel
#[derive(Debug, Clone)]
pub struct BroadcastListener {
    sender: broadcast::Sender<StoreChangedEvent>,
}

impl BroadcastListener {
    pub fn new(sender: broadcast::Sender<StoreChangedEvent>) -> Self {
        Self { sender }
    }

    /// Opens another receiver on the same channel
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChangedEvent> {
        self.sender.subscribe()
    }
}

impl StoreListener for BroadcastListener {
    fn on_store_changed(&mut self, event: &StoreChanged, store: &CueStore) {
        let payload = StoreChangedEvent::new(event, store);
        if self.sender.send(payload).is_err() {
            tracing::trace!(op_id = %event.op_id, "No event receivers, dropping event");
        }
    }
}

/// Creates a broadcast listener and its first receiver
pub fn event_channel(
    capacity: usize,
) -> (BroadcastListener, broadcast::Receiver<StoreChangedEvent>) {
    let (sender, receiver) = broadcast::channel(capacity.max(1));
    (BroadcastListener::new(sender), receiver)
}
