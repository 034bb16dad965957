//! Command Executor Module
//!
//! Handles command execution and change notification.
//! This is the central hub for all store-changing operations.

use crate::core::{
    commands::{Command, CommandResult, StateChange},
    cues::CueStore,
    sync::{StoreChanged, StoreListener, SyncNotifier},
    CoreError, CoreResult, SubscriptionId,
};

// =============================================================================
// Command Executor
// =============================================================================

/// Executes commands against a store and notifies listeners.
///
/// One [`StoreChanged`] is published per command that changed something.
/// No-ops publish nothing. Rejected timing edits publish a single
/// [`StateChange::EditRejected`] so views can snap back or show the error.
#[derive(Debug, Default)]
pub struct CommandExecutor {
    notifier: SyncNotifier,
    executed_count: u64,
    last_command_type: Option<String>,
}

impl CommandExecutor {
    /// Creates a new command executor without listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a command and publishes its changes
    pub fn execute(
        &mut self,
        mut command: Box<dyn Command>,
        store: &mut CueStore,
    ) -> CoreResult<CommandResult> {
        let type_name = command.type_name();
        tracing::debug!(command = type_name, payload = %command.to_json(), "Executing command");

        match command.execute(store) {
            Ok(result) => {
                self.executed_count += 1;
                self.last_command_type = Some(type_name.to_string());
                if result.is_noop() {
                    tracing::trace!(command = type_name, "Command changed nothing");
                } else {
                    let event = StoreChanged::from_result(type_name, &result);
                    self.notifier.notify(&event, store);
                }
                Ok(result)
            }
            Err(err) => {
                tracing::warn!(command = type_name, error = %err, "Command rejected");
                if let Some(change) = Self::rejection_change(&err, command.target()) {
                    let result = CommandResult::generate().with_change(change);
                    let event = StoreChanged::from_result(type_name, &result);
                    self.notifier.notify(&event, store);
                }
                Err(err)
            }
        }
    }

    /// Maps a timing rejection to the change views react to
    fn rejection_change(
        err: &CoreError,
        target: Option<crate::core::CueIndex>,
    ) -> Option<StateChange> {
        match err {
            CoreError::InvalidTiming {
                index,
                field,
                message,
                ..
            } => Some(StateChange::EditRejected {
                index: Some(*index),
                field: Some(*field),
                message: message.clone(),
            }),
            CoreError::InvalidTimeRange(..) => Some(StateChange::EditRejected {
                index: target,
                field: None,
                message: err.to_string(),
            }),
            _ => None,
        }
    }

    /// Subscribes a listener to store changes
    pub fn subscribe(&mut self, listener: Box<dyn StoreListener>) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    /// Unsubscribes a listener
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Number of commands that executed successfully
    pub fn executed_count(&self) -> u64 {
        self.executed_count
    }

    /// Number of change events published
    pub fn published_count(&self) -> u64 {
        self.notifier.published_count()
    }

    /// Type name of the last successful command
    pub fn last_command_type(&self) -> Option<&str> {
        self.last_command_type.as_deref()
    }
}

// =============================================================================
// Tests
// =============================================================================
