//! Playback Collaboration
//!
//! Traits for the external media, waveform and track surfaces, an
//! in-memory player, and the boundary watch used by "play selected".

mod surface;
mod watch;

pub use surface::*;
pub use watch::*;
