//! Cuedit Core Type Definitions
//!
//! Defines fundamental types used throughout the project.

use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Position of a cue in the cue list (0-based)
pub type CueIndex = usize;

/// Operation unique identifier (ULID)
pub type OpId = String;

/// Editor session unique identifier (ULID)
pub type SessionId = String;

/// Listener subscription identifier
pub type SubscriptionId = u64;

// =============================================================================
// Time Types
// =============================================================================

/// Time in seconds (floating point), as exchanged with playback surfaces
pub type TimeSec = f64;

// =============================================================================
// Timing Fields
// =============================================================================

/// Which bound of a cue a timing edit targets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimingField {
    Start,
    End,
}

impl TimingField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

impl std::fmt::Display for TimingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clamps a playback time into `[0, duration]`.
///
/// Non-finite input collapses to 0. Without a known duration only the
/// lower bound applies.
pub fn clamp_time_sec(value: TimeSec, duration: Option<TimeSec>) -> TimeSec {
    if !value.is_finite() {
        return 0.0;
    }
    let lower = value.max(0.0);
    match duration {
        Some(d) if d.is_finite() && d >= 0.0 => lower.min(d),
        _ => lower,
    }
}
