//! Cue Commands Module
//!
//! Implements the cue editing commands. Each command wraps one store
//! mutation and reports what it changed; a command that changes nothing
//! returns an empty result.

use serde::{Deserialize, Serialize};

use crate::core::{
    commands::{Command, CommandResult, StateChange},
    cues::{Cue, CueAlign, CueStore, SuccessorFix, DEFAULT_CUE_SPAN},
    CoreResult, CueIndex, TimeCode, TimingField,
};

fn to_json_value<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::json!({}))
}

/// Appends a selection change when the selection moved during execution.
fn with_selection_change(
    result: CommandResult,
    before: Option<CueIndex>,
    store: &CueStore,
) -> CommandResult {
    let after = store.selected_index();
    if before == after {
        result
    } else {
        result.with_change(StateChange::SelectionChanged { selected: after })
    }
}

// =============================================================================
// LoadCuesCommand
// =============================================================================

/// Command to replace the whole cue list (decode or reload).
#[derive(Clone, Debug)]
pub struct LoadCuesCommand {
    cues: Option<Vec<Cue>>,
    count: usize,
}

impl LoadCuesCommand {
    pub fn new(cues: Vec<Cue>) -> Self {
        Self {
            count: cues.len(),
            cues: Some(cues),
        }
    }
}

impl Command for LoadCuesCommand {
    fn execute(&mut self, store: &mut CueStore) -> CoreResult<CommandResult> {
        let cues = self.cues.take().unwrap_or_default();
        self.count = cues.len();
        store.reset(cues);

        Ok(CommandResult::generate().with_change(StateChange::CuesLoaded { count: self.count }))
    }

    fn type_name(&self) -> &'static str {
        "LoadCues"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "count": self.count })
    }
}

// =============================================================================
// AdjustTimingCommand
// =============================================================================

/// Command to commit one timing bound from raw table input.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustTimingCommand {
    pub index: CueIndex,
    pub field: TimingField,
    pub value: String,
}

impl AdjustTimingCommand {
    pub fn new(index: CueIndex, field: TimingField, value: impl Into<String>) -> Self {
        Self {
            index,
            field,
            value: value.into(),
        }
    }
}

impl Command for AdjustTimingCommand {
    fn execute(&mut self, store: &mut CueStore) -> CoreResult<CommandResult> {
        let had_error = store.field_error().is_some();
        let changed = store.adjust_timing(self.index, self.field, &self.value)?;

        let result = CommandResult::generate();
        Ok(if changed {
            result.with_change(StateChange::CueRetimed { index: self.index })
        } else if had_error {
            result.with_change(StateChange::FieldErrorCleared { index: self.index })
        } else {
            result
        })
    }

    fn type_name(&self) -> &'static str {
        "AdjustTiming"
    }

    fn to_json(&self) -> serde_json::Value {
        to_json_value(self)
    }

    fn target(&self) -> Option<CueIndex> {
        Some(self.index)
    }
}

// =============================================================================
// RetimeCueCommand
// =============================================================================

/// Command to move both bounds at once, as produced by a region drag.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetimeCueCommand {
    pub index: CueIndex,
    pub start: TimeCode,
    pub end: TimeCode,
}

impl RetimeCueCommand {
    pub fn new(index: CueIndex, start: TimeCode, end: TimeCode) -> Self {
        Self { index, start, end }
    }
}

impl Command for RetimeCueCommand {
    fn execute(&mut self, store: &mut CueStore) -> CoreResult<CommandResult> {
        let had_error = store.field_error().is_some();
        let changed = store.retime(self.index, self.start, self.end)?;
        let result = CommandResult::generate();
        Ok(if changed {
            result.with_change(StateChange::CueRetimed { index: self.index })
        } else if had_error {
            result.with_change(StateChange::FieldErrorCleared { index: self.index })
        } else {
            result
        })
    }

    fn type_name(&self) -> &'static str {
        "RetimeCue"
    }

    fn to_json(&self) -> serde_json::Value {
        to_json_value(self)
    }

    fn target(&self) -> Option<CueIndex> {
        Some(self.index)
    }
}

// =============================================================================
// EditTextCommand
// =============================================================================

/// Command to replace cue text.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTextCommand {
    pub index: CueIndex,
    pub text: String,
}

impl EditTextCommand {
    pub fn new(index: CueIndex, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

impl Command for EditTextCommand {
    fn execute(&mut self, store: &mut CueStore) -> CoreResult<CommandResult> {
        let changed = store.edit_text(self.index, &self.text)?;
        let result = CommandResult::generate();
        Ok(if changed {
            result.with_change(StateChange::CueTextChanged { index: self.index })
        } else {
            result
        })
    }

    fn type_name(&self) -> &'static str {
        "EditText"
    }

    fn to_json(&self) -> serde_json::Value {
        to_json_value(self)
    }

    fn target(&self) -> Option<CueIndex> {
        Some(self.index)
    }
}

// =============================================================================
// SetAlignmentCommand
// =============================================================================

/// Command to set cue position and alignment together.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAlignmentCommand {
    pub index: CueIndex,
    pub position: u8,
    pub align: CueAlign,
}

impl SetAlignmentCommand {
    pub fn new(index: CueIndex, position: u8, align: CueAlign) -> Self {
        Self {
            index,
            position,
            align,
        }
    }
}

impl Command for SetAlignmentCommand {
    fn execute(&mut self, store: &mut CueStore) -> CoreResult<CommandResult> {
        let changed = store.set_alignment(self.index, self.position, self.align)?;
        let result = CommandResult::generate();
        Ok(if changed {
            result.with_change(StateChange::CueAlignmentChanged { index: self.index })
        } else {
            result
        })
    }

    fn type_name(&self) -> &'static str {
        "SetAlignment"
    }

    fn to_json(&self) -> serde_json::Value {
        to_json_value(self)
    }

    fn target(&self) -> Option<CueIndex> {
        Some(self.index)
    }
}

// =============================================================================
// InsertCueCommand
// =============================================================================

/// Command to insert an empty cue near the playhead.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertCueCommand {
    pub current_time: TimeCode,
    pub selected: Option<CueIndex>,
    pub span: TimeCode,
    pub media_duration: Option<TimeCode>,
    /// Select the new cue once inserted (the editor gesture does this)
    pub select_inserted: bool,
    #[serde(skip)]
    inserted_index: Option<CueIndex>,
}

impl InsertCueCommand {
    pub fn new(current_time: TimeCode, selected: Option<CueIndex>) -> Self {
        Self {
            current_time,
            selected,
            span: DEFAULT_CUE_SPAN,
            media_duration: None,
            select_inserted: false,
            inserted_index: None,
        }
    }

    pub fn with_span(mut self, span: TimeCode) -> Self {
        self.span = span;
        self
    }

    pub fn with_media_duration(mut self, duration: Option<TimeCode>) -> Self {
        self.media_duration = duration;
        self
    }

    pub fn selecting_inserted(mut self) -> Self {
        self.select_inserted = true;
        self
    }

    /// Index of the inserted cue, once executed
    pub fn inserted_index(&self) -> Option<CueIndex> {
        self.inserted_index
    }
}

impl Command for InsertCueCommand {
    fn execute(&mut self, store: &mut CueStore) -> CoreResult<CommandResult> {
        let before = store.selected_index();
        let outcome =
            store.insert_cue(self.current_time, self.selected, self.span, self.media_duration)?;
        self.inserted_index = Some(outcome.index);

        let mut result = CommandResult::generate();
        match outcome.successor {
            SuccessorFix::Removed => {
                result = result.with_change(StateChange::CueRemoved {
                    index: outcome.index,
                });
            }
            SuccessorFix::Trimmed => {
                result = result.with_change(StateChange::CueRetimed {
                    index: outcome.index + 1,
                });
            }
            SuccessorFix::Untouched => {}
        }
        result = result.with_change(StateChange::CueInserted {
            index: outcome.index,
        });

        if self.select_inserted {
            store.select(Some(outcome.index))?;
        }
        Ok(with_selection_change(result, before, store))
    }

    fn type_name(&self) -> &'static str {
        "InsertCue"
    }

    fn to_json(&self) -> serde_json::Value {
        to_json_value(self)
    }

    fn target(&self) -> Option<CueIndex> {
        self.selected
    }
}

// =============================================================================
// DeleteCueCommand
// =============================================================================

/// Command to delete a cue.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCueCommand {
    pub index: CueIndex,
    #[serde(skip)]
    removed: Option<Cue>,
}

impl DeleteCueCommand {
    pub fn new(index: CueIndex) -> Self {
        Self {
            index,
            removed: None,
        }
    }

    /// The removed cue, once executed
    pub fn removed(&self) -> Option<&Cue> {
        self.removed.as_ref()
    }
}

impl Command for DeleteCueCommand {
    fn execute(&mut self, store: &mut CueStore) -> CoreResult<CommandResult> {
        let before = store.selected_index();
        self.removed = Some(store.delete_cue(self.index)?);

        let result =
            CommandResult::generate().with_change(StateChange::CueRemoved { index: self.index });
        Ok(with_selection_change(result, before, store))
    }

    fn type_name(&self) -> &'static str {
        "DeleteCue"
    }

    fn to_json(&self) -> serde_json::Value {
        to_json_value(self)
    }

    fn target(&self) -> Option<CueIndex> {
        Some(self.index)
    }
}

// =============================================================================
// SelectCueCommand
// =============================================================================

/// Command to set or clear the selection.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectCueCommand {
    pub index: Option<CueIndex>,
}

impl SelectCueCommand {
    pub fn new(index: Option<CueIndex>) -> Self {
        Self { index }
    }
}

impl Command for SelectCueCommand {
    fn execute(&mut self, store: &mut CueStore) -> CoreResult<CommandResult> {
        let changed = store.select(self.index)?;
        let result = CommandResult::generate();
        Ok(if changed {
            result.with_change(StateChange::SelectionChanged {
                selected: self.index,
            })
        } else {
            result
        })
    }

    fn type_name(&self) -> &'static str {
        "SelectCue"
    }

    fn to_json(&self) -> serde_json::Value {
        to_json_value(self)
    }

    fn target(&self) -> Option<CueIndex> {
        self.index
    }
}

// =============================================================================
// Tests
// =============================================================================
