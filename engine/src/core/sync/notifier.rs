//! Sync Notifier
//!
//! Fans out store change events to every subscribed view. Listeners run
//! synchronously, in subscription order, after each effective mutation.

use serde::{Deserialize, Serialize};

use crate::core::{
    commands::{CommandResult, StateChange},
    cues::CueStore,
    OpId, SubscriptionId,
};

// =============================================================================
// Store Changed Event
// =============================================================================

/// Emitted once per effective store mutation (or rejected timing edit)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreChanged {
    pub op_id: OpId,
    /// Command type name that produced the change
    pub command: String,
    pub changes: Vec<StateChange>,
}

impl StoreChanged {
    pub fn from_result(command: &str, result: &CommandResult) -> Self {
        Self {
            op_id: result.op_id.clone(),
            command: command.to_string(),
            changes: result.changes.clone(),
        }
    }

    /// Returns true if cues were added, removed or reloaded
    pub fn is_structural(&self) -> bool {
        self.changes.iter().any(StateChange::is_structural)
    }

    /// Returns true if this event reports a rejected edit
    pub fn is_rejection(&self) -> bool {
        self.changes
            .iter()
            .any(|c| matches!(c, StateChange::EditRejected { .. }))
    }
}

// =============================================================================
// Listener
// =============================================================================

/// A view that re-renders from the store after each change
pub trait StoreListener {
    fn on_store_changed(&mut self, event: &StoreChanged, store: &CueStore);
}

impl<F> StoreListener for F
where
    F: FnMut(&StoreChanged, &CueStore),
{
    fn on_store_changed(&mut self, event: &StoreChanged, store: &CueStore) {
        self(event, store)
    }
}

// =============================================================================
// Notifier
// =============================================================================

/// Ordered list of subscribed listeners
#[derive(Default)]
pub struct SyncNotifier {
    listeners: Vec<(SubscriptionId, Box<dyn StoreListener>)>,
    next_id: SubscriptionId,
    published: u64,
}

impl std::fmt::Debug for SyncNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncNotifier")
            .field("listeners", &self.listeners.len())
            .field("published", &self.published)
            .finish()
    }
}

impl SyncNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener; it receives every later event
    pub fn subscribe(&mut self, listener: Box<dyn StoreListener>) -> SubscriptionId {
        self.next_id += 1;
        let id = self.next_id;
        self.listeners.push((id, listener));
        tracing::debug!(subscription = id, "Listener subscribed");
        id
    }

    /// Removes a listener; returns false for unknown ids
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Delivers `event` to each listener in subscription order
    pub fn notify(&mut self, event: &StoreChanged, store: &CueStore) {
        self.published += 1;
        tracing::trace!(
            op_id = %event.op_id,
            command = %event.command,
            listeners = self.listeners.len(),
            "Notifying listeners"
        );
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_store_changed(event, store);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of events delivered so far
    pub fn published_count(&self) -> u64 {
        self.published
    }
}

// =============================================================================
// Tests
// =============================================================================
