//! Cue Data Models
//!
//! Defines the cue, the unit of the subtitle model.
//!
//! # Overview
//!
//! A cue carries:
//! - a 1-based sequence index, recomputed by the store after structural edits
//! - an optional identifier read from source text (never written back)
//! - start/end timestamps and a derived duration
//! - payload text plus `position`/`align` display hints

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::timecode::format_duration;
use crate::core::{CoreError, TimeCode, TimeSec};

/// Default horizontal position, in percent
pub const DEFAULT_POSITION: u8 = 50;

/// Highest accepted position, in percent
pub const MAX_POSITION: u8 = 100;

// =============================================================================
// Alignment
// =============================================================================

/// Cue text alignment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CueAlign {
    Start,
    /// Centered (default)
    #[default]
    Center,
    End,
}

impl CueAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        }
    }
}

impl std::fmt::Display for CueAlign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CueAlign {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "center" => Ok(Self::Center),
            "end" => Ok(Self::End),
            other => Err(CoreError::ValidationError(format!(
                "Unknown cue alignment: {}",
                other
            ))),
        }
    }
}

// =============================================================================
// Cue Entry
// =============================================================================

/// A single timed text entry
///
/// Timing fields are only reachable through the store, which enforces
/// `start < end` on every edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    pub(crate) sequence_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<String>,
    pub(crate) start: TimeCode,
    pub(crate) end: TimeCode,
    pub(crate) text: String,
    pub(crate) position: u8,
    pub(crate) align: CueAlign,
}

impl Cue {
    /// Creates a cue with default placement; text is trimmed.
    pub fn new(start: TimeCode, end: TimeCode, text: &str) -> Self {
        Self {
            sequence_index: 0,
            id: None,
            start,
            end,
            text: text.trim().to_string(),
            position: DEFAULT_POSITION,
            align: CueAlign::default(),
        }
    }

    /// Sets the source identifier
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Sets position (clamped to 100) and alignment
    pub fn with_placement(mut self, position: u8, align: CueAlign) -> Self {
        self.position = position.min(MAX_POSITION);
        self.align = align;
        self
    }

    /// 1-based position in the list; 0 until the cue is placed in a list
    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn start(&self) -> TimeCode {
        self.start
    }

    pub fn end(&self) -> TimeCode {
        self.end
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn align(&self) -> CueAlign {
        self.align
    }

    /// Derived duration text, `(end - start)` seconds to 3 decimals
    pub fn duration(&self) -> String {
        format_duration(self.start, self.end)
    }

    /// Returns true when `start < end`
    pub fn has_valid_timing(&self) -> bool {
        self.start < self.end
    }

    /// Returns true if `time` lies within `[start, end]` (both bounds inclusive)
    pub fn contains(&self, time: TimeCode) -> bool {
        time >= self.start && time <= self.end
    }

    pub fn start_sec(&self) -> TimeSec {
        self.start.as_secs_f64()
    }

    pub fn end_sec(&self) -> TimeSec {
        self.end.as_secs_f64()
    }
}

// =============================================================================
// Tests
// =============================================================================
