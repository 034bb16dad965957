//! Cuedit Error Definitions
//!
//! Defines error types used throughout the project.

use thiserror::Error;

use super::{CueIndex, TimeCode, TimingField};

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Cue Errors
    // =========================================================================
    #[error("Cue not found at index {0}")]
    CueNotFound(CueIndex),

    #[error("Invalid {field} time for cue #{}: {message}", .index + 1)]
    InvalidTiming {
        index: CueIndex,
        field: TimingField,
        start: TimeCode,
        end: TimeCode,
        message: String,
    },

    #[error("Invalid time range: {0} --> {1}")]
    InvalidTimeRange(TimeCode, TimeCode),

    #[error("Invalid timecode: {0}")]
    InvalidTimeCode(String),

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Settings error: {0}")]
    SettingsError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Convert to a user-friendly error message
    pub fn to_ipc_error(&self) -> String {
        self.to_string()
    }

    /// Returns true for errors that reject an edit and leave state untouched
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::CueNotFound(_)
                | Self::InvalidTiming { .. }
                | Self::InvalidTimeRange(..)
                | Self::InvalidTimeCode(_)
                | Self::ValidationError(_)
        )
    }
}
