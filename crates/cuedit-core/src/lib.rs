//! Cuedit Core
//!
//! Public facade over the engine library plus the event broadcasting
//! bridge used by front ends that consume store changes asynchronously.

pub use cuedit_lib::core::*;
pub use cuedit_lib::logging;

pub mod events;
