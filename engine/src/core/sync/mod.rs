//! Sync Notifier
//!
//! Keeps the table, waveform regions, access list and playback track in
//! step with the store. Every effective mutation publishes one
//! [`StoreChanged`]; views subscribe once and re-render from a snapshot.

mod notifier;
mod views;

pub use notifier::*;
pub use views::*;
