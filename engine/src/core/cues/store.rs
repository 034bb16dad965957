//! Cue Store
//!
//! Owns the ordered cue list and the selection. Every operation validates
//! before mutating and either applies fully or leaves the store untouched.
//!
//! The list is not kept chronologically sorted: direct timing edits and
//! drags may reorder or overlap cues. Only [`CueStore::insert_cue`]
//! resolves overlap, and only against the cue that immediately follows
//! the new one.

use serde::{Deserialize, Serialize};

use super::{Cue, CueAlign, MAX_POSITION};
use crate::core::{CoreError, CoreResult, CueIndex, TimeCode, TimingField};

/// Default span of a newly inserted cue
pub const DEFAULT_CUE_SPAN: TimeCode = TimeCode::from_millis(1_000);

/// Message surfaced when a timing edit would make `start >= end`
pub const TIMING_ORDER_MESSAGE: &str = "Start time must be less than end time.";

// =============================================================================
// Selection
// =============================================================================

/// Selection state: nothing, or exactly one valid list position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "index", rename_all = "camelCase")]
pub enum Selection {
    #[default]
    Unselected,
    Selected(CueIndex),
}

impl Selection {
    pub fn index(&self) -> Option<CueIndex> {
        match self {
            Self::Unselected => None,
            Self::Selected(i) => Some(*i),
        }
    }

    pub fn is_selected(&self, index: CueIndex) -> bool {
        self.index() == Some(index)
    }

    /// Shifts the selection for a cue removed at `removed`.
    fn after_remove(self, removed: CueIndex) -> Self {
        match self {
            Self::Selected(i) if i == removed => Self::Unselected,
            Self::Selected(i) if i > removed => Self::Selected(i - 1),
            other => other,
        }
    }

    /// Shifts the selection for a cue inserted at `inserted`.
    fn after_insert(self, inserted: CueIndex) -> Self {
        match self {
            Self::Selected(i) if i >= inserted => Self::Selected(i + 1),
            other => other,
        }
    }
}

impl From<Option<CueIndex>> for Selection {
    fn from(index: Option<CueIndex>) -> Self {
        index.map_or(Self::Unselected, Self::Selected)
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Field-level validation error shown next to the offending table input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub index: CueIndex,
    pub field: TimingField,
    pub message: String,
}

// =============================================================================
// Insert Outcome
// =============================================================================

/// What happened to the cue that followed the insertion point
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuccessorFix {
    /// No successor, or no overlap
    Untouched,
    /// Successor start moved forward to the new cue's end
    Trimmed,
    /// Successor was fully covered and removed
    Removed,
}

/// Result of a successful insert
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Index of the new cue in the list
    pub index: CueIndex,
    pub successor: SuccessorFix,
}

// =============================================================================
// Cue Store
// =============================================================================

/// Ordered cue list plus selection
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CueStore {
    cues: Vec<Cue>,
    selection: Selection,
    field_error: Option<FieldError>,
}

impl CueStore {
    /// Creates a store from decoded cues; sequence indices are recomputed
    pub fn new(cues: Vec<Cue>) -> Self {
        let mut store = Self {
            cues,
            ..Self::default()
        };
        store.renumber();
        store
    }

    /// Replaces the whole list, clearing selection and field errors
    pub fn reset(&mut self, cues: Vec<Cue>) {
        *self = Self::new(cues);
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn get(&self, index: CueIndex) -> Option<&Cue> {
        self.cues.get(index)
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected_index(&self) -> Option<CueIndex> {
        self.selection.index()
    }

    pub fn selected_cue(&self) -> Option<&Cue> {
        self.selection.index().and_then(|i| self.cues.get(i))
    }

    pub fn field_error(&self) -> Option<&FieldError> {
        self.field_error.as_ref()
    }

    /// First cue whose `[start, end]` contains `time`
    pub fn cue_at(&self, time: TimeCode) -> Option<CueIndex> {
        self.cues.iter().position(|c| c.contains(time))
    }

    fn cue_mut(&mut self, index: CueIndex) -> CoreResult<&mut Cue> {
        self.cues
            .get_mut(index)
            .ok_or(CoreError::CueNotFound(index))
    }

    fn renumber(&mut self) {
        for (i, cue) in self.cues.iter_mut().enumerate() {
            cue.sequence_index = i + 1;
        }
    }

    // -------------------------------------------------------------------------
    // Field edits
    // -------------------------------------------------------------------------

    /// Commits one timing bound from raw table input.
    ///
    /// The raw text is parsed fail-soft. A candidate with `start >= end` is
    /// rejected: the cue is untouched and a field error is recorded.
    /// Returns `Ok(false)` when the value is already current.
    pub fn adjust_timing(
        &mut self,
        index: CueIndex,
        field: TimingField,
        raw_value: &str,
    ) -> CoreResult<bool> {
        let cue = self.cues.get(index).ok_or(CoreError::CueNotFound(index))?;
        let value = TimeCode::parse(raw_value);
        let (start, end) = match field {
            TimingField::Start => (value, cue.end),
            TimingField::End => (cue.start, value),
        };

        if start >= end {
            tracing::debug!(index, %field, %start, %end, "Rejecting timing edit");
            self.field_error = Some(FieldError {
                index,
                field,
                message: TIMING_ORDER_MESSAGE.to_string(),
            });
            return Err(CoreError::InvalidTiming {
                index,
                field,
                start,
                end,
                message: TIMING_ORDER_MESSAGE.to_string(),
            });
        }

        self.field_error = None;
        let cue = self.cue_mut(index)?;
        if cue.start == start && cue.end == end {
            return Ok(false);
        }
        cue.start = start;
        cue.end = end;
        Ok(true)
    }

    /// Commits both bounds at once (annotation drag or resize).
    ///
    /// A successful commit clears any pending field error.
    pub fn retime(&mut self, index: CueIndex, start: TimeCode, end: TimeCode) -> CoreResult<bool> {
        if start >= end {
            return Err(CoreError::InvalidTimeRange(start, end));
        }
        if index >= self.cues.len() {
            return Err(CoreError::CueNotFound(index));
        }

        self.field_error = None;
        let cue = self.cue_mut(index)?;
        if cue.start == start && cue.end == end {
            return Ok(false);
        }
        cue.start = start;
        cue.end = end;
        Ok(true)
    }

    /// Stores trimmed text; `Ok(false)` when nothing changed.
    pub fn edit_text(&mut self, index: CueIndex, raw_text: &str) -> CoreResult<bool> {
        let cue = self.cue_mut(index)?;
        let text = raw_text.trim();
        if cue.text == text {
            return Ok(false);
        }
        cue.text = text.to_string();
        Ok(true)
    }

    /// Sets position and alignment together.
    pub fn set_alignment(
        &mut self,
        index: CueIndex,
        position: u8,
        align: CueAlign,
    ) -> CoreResult<bool> {
        if position > MAX_POSITION {
            return Err(CoreError::ValidationError(format!(
                "Cue position must be between 0 and {}: {}",
                MAX_POSITION, position
            )));
        }
        let cue = self.cue_mut(index)?;
        if cue.position == position && cue.align == align {
            return Ok(false);
        }
        cue.position = position;
        cue.align = align;
        Ok(true)
    }

    // -------------------------------------------------------------------------
    // Structural edits
    // -------------------------------------------------------------------------

    /// Inserts an empty cue.
    ///
    /// Placement precedence:
    /// 1. after the selected cue, starting at its end;
    /// 2. after the first cue containing `current_time`, starting at its end;
    /// 3. at `current_time`, before the first cue starting later (or last).
    ///
    /// The new cue spans `span`, clamped to `media_duration`. A successor
    /// overlapping the new cue is trimmed, or removed when fully covered.
    pub fn insert_cue(
        &mut self,
        current_time: TimeCode,
        selected: Option<CueIndex>,
        span: TimeCode,
        media_duration: Option<TimeCode>,
    ) -> CoreResult<InsertOutcome> {
        let anchor = selected
            .filter(|&i| i < self.cues.len())
            .or_else(|| self.cue_at(current_time));

        let (insert_at, start) = match anchor {
            Some(i) => (i + 1, self.cues[i].end),
            None => {
                let at = self
                    .cues
                    .iter()
                    .position(|c| c.start > current_time)
                    .unwrap_or(self.cues.len());
                (at, current_time)
            }
        };

        let mut end = start.saturating_add(span);
        if let Some(limit) = media_duration {
            end = end.min(limit);
        }
        if start >= end {
            return Err(CoreError::InvalidTimeRange(start, end));
        }

        let mut successor = SuccessorFix::Untouched;
        if let Some(next) = self.cues.get_mut(insert_at) {
            if next.start < end {
                if next.end <= end {
                    successor = SuccessorFix::Removed;
                } else {
                    next.start = end;
                    successor = SuccessorFix::Trimmed;
                }
            }
        }
        if successor == SuccessorFix::Removed {
            self.cues.remove(insert_at);
            self.selection = self.selection.after_remove(insert_at);
        }

        self.cues.insert(insert_at, Cue::new(start, end, ""));
        self.selection = self.selection.after_insert(insert_at);
        self.field_error = None;
        self.renumber();

        tracing::debug!(index = insert_at, %start, %end, ?successor, "Inserted cue");
        Ok(InsertOutcome {
            index: insert_at,
            successor,
        })
    }

    /// Removes the cue at `index` and renumbers the rest.
    pub fn delete_cue(&mut self, index: CueIndex) -> CoreResult<Cue> {
        if index >= self.cues.len() {
            return Err(CoreError::CueNotFound(index));
        }
        let removed = self.cues.remove(index);
        self.selection = self.selection.after_remove(index);
        self.field_error = None;
        self.renumber();
        Ok(removed)
    }

    /// Sets or clears the selection; out-of-range indices are rejected.
    pub fn select(&mut self, index: Option<CueIndex>) -> CoreResult<bool> {
        if let Some(i) = index {
            if i >= self.cues.len() {
                return Err(CoreError::CueNotFound(i));
            }
        }
        let next = Selection::from(index);
        if next == self.selection {
            return Ok(false);
        }
        self.selection = next;
        Ok(true)
    }
}

// =============================================================================
// Tests
// =============================================================================
