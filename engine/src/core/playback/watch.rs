//! Boundary Watch
//!
//! Stops playback when the playhead reaches the end of the cue being
//! played. At most one watch is live per session; starting another
//! cancels the previous one through its [`WatchHandle`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::PlaybackSurface;
use crate::core::{CueIndex, TimeSec};

/// Cancellation handle shared with whoever started the watch
#[derive(Clone, Debug)]
pub struct WatchHandle {
    live: Arc<AtomicBool>,
}

impl WatchHandle {
    fn new() -> Self {
        Self {
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn cancel(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

/// Result of one frame check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchTick {
    /// End not reached yet
    Running,
    /// Playback paused at the boundary; the watch is done
    Finished,
    /// The watch was cancelled before reaching the boundary
    Cancelled,
}

/// Per-frame check that pauses playback at a cue end
#[derive(Debug)]
pub struct BoundaryWatch {
    index: CueIndex,
    end: TimeSec,
    handle: WatchHandle,
}

impl BoundaryWatch {
    pub fn start(index: CueIndex, end: TimeSec) -> Self {
        tracing::debug!(index, end, "Boundary watch started");
        Self {
            index,
            end,
            handle: WatchHandle::new(),
        }
    }

    pub fn handle(&self) -> WatchHandle {
        self.handle.clone()
    }

    pub fn index(&self) -> CueIndex {
        self.index
    }

    pub fn end(&self) -> TimeSec {
        self.end
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }

    /// Checks the playhead once; pins it to the end and pauses when reached.
    pub fn tick(&self, player: &mut dyn PlaybackSurface) -> WatchTick {
        if !self.handle.is_active() {
            return WatchTick::Cancelled;
        }
        if player.current_time() < self.end {
            return WatchTick::Running;
        }
        player.pause();
        player.set_current_time(self.end);
        self.handle.cancel();
        tracing::debug!(index = self.index, end = self.end, "Boundary reached");
        WatchTick::Finished
    }
}
