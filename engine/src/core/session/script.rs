//! Edit Scripts
//!
//! A script is a JSON array of [`EditOp`]s replayed against a session,
//! one gesture per entry:
//!
//! ```json
//! [
//!   { "op": "seek", "time": 3.0 },
//!   { "op": "insertCue" },
//!   { "op": "editText", "index": 1, "text": "New line" },
//!   { "op": "adjustTiming", "index": 0, "field": "end", "value": "00:00:04.500" }
//! ]
//! ```

use serde::{Deserialize, Serialize};

use super::EditorSession;
use crate::core::{cues::CueAlign, CoreResult, CueIndex, TimeSec, TimingField};

/// One scripted gesture
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum EditOp {
    AdjustTiming {
        index: CueIndex,
        field: TimingField,
        value: String,
    },
    EditText {
        index: CueIndex,
        text: String,
    },
    SetAlignment {
        index: CueIndex,
        position: u8,
        align: CueAlign,
    },
    /// Insert at the playhead and select the new cue
    InsertCue,
    DeleteCue {
        index: CueIndex,
    },
    DeleteSelected,
    Select {
        index: Option<CueIndex>,
    },
    /// Region drag or resize, in seconds
    MoveRegion {
        index: CueIndex,
        start: TimeSec,
        end: TimeSec,
    },
    /// Absolute playhead move, in seconds
    Seek {
        time: TimeSec,
    },
    SeekBy {
        delta: TimeSec,
    },
    SelectAndSeek {
        index: CueIndex,
        time: TimeSec,
    },
}

impl EditOp {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AdjustTiming { .. } => "adjustTiming",
            Self::EditText { .. } => "editText",
            Self::SetAlignment { .. } => "setAlignment",
            Self::InsertCue => "insertCue",
            Self::DeleteCue { .. } => "deleteCue",
            Self::DeleteSelected => "deleteSelected",
            Self::Select { .. } => "select",
            Self::MoveRegion { .. } => "moveRegion",
            Self::Seek { .. } => "seek",
            Self::SeekBy { .. } => "seekBy",
            Self::SelectAndSeek { .. } => "selectAndSeek",
        }
    }
}

/// Parses a JSON script
pub fn parse_script(json: &str) -> CoreResult<Vec<EditOp>> {
    Ok(serde_json::from_str(json)?)
}

/// An operation the session refused
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedOp {
    /// 0-based position in the script
    pub step: usize,
    pub op: String,
    pub message: String,
}

/// Outcome of a script run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptReport {
    pub applied: usize,
    pub rejected: Vec<RejectedOp>,
}

impl EditorSession {
    /// Performs one scripted gesture
    pub fn apply(&mut self, op: &EditOp) -> CoreResult<()> {
        match op {
            EditOp::AdjustTiming {
                index,
                field,
                value,
            } => self.adjust_timing(*index, *field, value).map(drop),
            EditOp::EditText { index, text } => self.edit_text(*index, text).map(drop),
            EditOp::SetAlignment {
                index,
                position,
                align,
            } => self.set_alignment(*index, *position, *align).map(drop),
            EditOp::InsertCue => self.insert_cue().map(drop),
            EditOp::DeleteCue { index } => self.delete_cue(*index).map(drop),
            EditOp::DeleteSelected => self.delete_selected().map(drop),
            EditOp::Select { index } => self.select(*index).map(drop),
            EditOp::MoveRegion { index, start, end } => {
                self.on_region_updated(*index, *start, *end).map(drop)
            }
            EditOp::Seek { time } => {
                self.seek_to(*time);
                Ok(())
            }
            EditOp::SeekBy { delta } => {
                self.seek_by(*delta);
                Ok(())
            }
            EditOp::SelectAndSeek { index, time } => self.select_and_seek(*index, *time),
        }
    }

    /// Replays `ops` in order.
    ///
    /// Rejected edits are recorded and the run continues; any other
    /// error aborts the run.
    pub fn apply_script(&mut self, ops: &[EditOp]) -> CoreResult<ScriptReport> {
        let mut report = ScriptReport::default();
        for (step, op) in ops.iter().enumerate() {
            match self.apply(op) {
                Ok(()) => report.applied += 1,
                Err(err) if err.is_rejection() => {
                    tracing::warn!(step, op = op.name(), error = %err, "Script step rejected");
                    report.rejected.push(RejectedOp {
                        step,
                        op: op.name().to_string(),
                        message: err.to_ipc_error(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
        Ok(report)
    }
}
