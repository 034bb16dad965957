//! Cuedit Core Library
//!
//! Subtitle cue editing engine. Owns one authoritative, ordered list of
//! timed WebVTT cues and keeps every presentation of it (table, waveform
//! regions, access list, playback track) consistent under live editing.
//!
//! Rendering, media decoding and file picking are left to the host; the
//! host talks to the engine through [`core::session::EditorSession`] and
//! the collaborator traits in [`core::playback`].

pub mod core;
pub mod logging;
