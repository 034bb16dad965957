//! Edit Command System
//!
//! All cue editing operations are performed through Commands in this module.

mod cue;
mod executor;
mod traits;

pub use cue::*;
pub use executor::*;
pub use traits::*;
