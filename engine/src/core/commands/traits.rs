//! Command Trait Definition
//!
//! Defines the trait that all edit commands must implement.

use serde::{Deserialize, Serialize};

use crate::core::{cues::CueStore, CoreResult, CueIndex, OpId, TimingField};

/// Command execution result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    /// Generated Operation ID
    pub op_id: OpId,

    /// List of state changes; empty when the command was a no-op
    pub changes: Vec<StateChange>,
}

impl CommandResult {
    /// Creates a new empty command result with the given operation ID
    pub fn new(op_id: &str) -> Self {
        Self {
            op_id: op_id.to_string(),
            changes: vec![],
        }
    }

    /// Creates an empty result with a fresh operation ID
    pub fn generate() -> Self {
        Self::new(&ulid::Ulid::new().to_string())
    }

    /// Adds a state change
    pub fn with_change(mut self, change: StateChange) -> Self {
        self.changes.push(change);
        self
    }

    /// Returns true if the command changed nothing
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

/// State change types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StateChange {
    CuesLoaded { count: usize },
    CueInserted { index: CueIndex },
    CueRemoved { index: CueIndex },
    CueRetimed { index: CueIndex },
    CueTextChanged { index: CueIndex },
    CueAlignmentChanged { index: CueIndex },
    SelectionChanged { selected: Option<CueIndex> },
    /// A pending field error was cleared without changing the cue
    FieldErrorCleared { index: CueIndex },
    EditRejected {
        index: Option<CueIndex>,
        field: Option<TimingField>,
        message: String,
    },
}

impl StateChange {
    /// Returns true for changes that add, remove or reorder cues
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::CuesLoaded { .. } | Self::CueInserted { .. } | Self::CueRemoved { .. }
        )
    }
}

/// Trait that all edit commands must implement
///
/// # Core Principles
/// - All store mutations go through Commands.
/// - A failing command leaves the store unchanged.
/// - Commands are serializable (for logging and edit scripts).
///
/// # Example
/// ```rust,ignore
/// pub struct EditTextCommand {
///     pub index: CueIndex,
///     pub text: String,
/// }
///
/// impl Command for EditTextCommand {
///     fn execute(&mut self, store: &mut CueStore) -> CoreResult<CommandResult> {
///         // Text edit logic
///     }
///
///     fn type_name(&self) -> &'static str {
///         "EditText"
///     }
///
///     fn to_json(&self) -> serde_json::Value {
///         serde_json::json!({ "index": self.index, "text": self.text })
///     }
/// }
/// ```
pub trait Command: Send + Sync {
    /// Execute the command
    ///
    /// Modifies the store and returns the result.
    /// On failure, the cue list and selection must remain unchanged.
    fn execute(&mut self, store: &mut CueStore) -> CoreResult<CommandResult>;

    /// Command type name
    ///
    /// Used for logging and debugging.
    fn type_name(&self) -> &'static str;

    /// JSON serialization
    fn to_json(&self) -> serde_json::Value;

    /// Cue the command targets, reported when the command is rejected
    fn target(&self) -> Option<CueIndex> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_change_serialization() {
        let change = StateChange::CueInserted { index: 2 };
        let json = serde_json::to_string(&change).unwrap();
        assert_eq!(json, r#"{"type":"cueInserted","index":2}"#);

        let rejected = StateChange::EditRejected {
            index: Some(0),
            field: Some(TimingField::Start),
            message: "bad".to_string(),
        };
        let json = serde_json::to_string(&rejected).unwrap();
        assert!(json.contains("editRejected"));
        assert!(json.contains("\"field\":\"start\""));
    }

    #[test]
    fn test_command_result_builder() {
        let result = CommandResult::new("op_001")
            .with_change(StateChange::CueRemoved { index: 1 })
            .with_change(StateChange::SelectionChanged { selected: None });

        assert_eq!(result.op_id, "op_001");
        assert_eq!(result.changes.len(), 2);
        assert!(!result.is_noop());
        assert!(CommandResult::generate().is_noop());
    }

    #[test]
    fn test_structural_changes() {
        assert!(StateChange::CuesLoaded { count: 0 }.is_structural());
        assert!(StateChange::CueRemoved { index: 0 }.is_structural());
        assert!(!StateChange::CueRetimed { index: 0 }.is_structural());
    }
}
