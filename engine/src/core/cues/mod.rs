//! Cue System Module
//!
//! Provides the subtitle cue model for Cuedit:
//! - Cue data model (Cue, CueAlign)
//! - WebVTT decoding and encoding
//! - The cue store (ordered list, selection, validated mutations)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Cue System                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  models.rs     - Cue entry and alignment                        │
//! │  formats.rs    - WebVTT decode/encode                           │
//! │  store.rs      - Ordered list, selection, mutation operations   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use crate::core::cues::{parse_vtt, export_vtt, CueStore};
//!
//! let mut store = CueStore::new(parse_vtt(&vtt_text));
//! store.edit_text(0, "Hello World")?;
//! let vtt_content = export_vtt(store.cues());
//! ```

mod formats;
mod models;
mod store;

// Re-export models
pub use models::{Cue, CueAlign, DEFAULT_POSITION, MAX_POSITION};

// Re-export format functions
pub use formats::{decode_vtt, export_vtt, parse_vtt, SkippedBlock, VttDocument};

// Re-export the store
pub use store::{
    CueStore, FieldError, InsertOutcome, Selection, SuccessorFix, DEFAULT_CUE_SPAN,
    TIMING_ORDER_MESSAGE,
};
