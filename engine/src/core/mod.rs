//! Cuedit Core Engine
//!
//! Cue model, WebVTT codec, mutation commands and view synchronization.

pub mod commands;
pub mod cues;
pub mod fs;
pub mod playback;
pub mod session;
pub mod settings;
pub mod sync;
pub mod timecode;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;

pub use timecode::TimeCode;

#[cfg(test)]
mod tests_destructive;
