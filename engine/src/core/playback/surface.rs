//! Playback Surfaces
//!
//! Seams to the media element, the waveform view and the caption track.
//! The editor only talks to these traits; [`HeadlessPlayer`] is the
//! in-memory implementation used off-screen.

use crate::core::{clamp_time_sec, sync::Region, TimeSec};

/// Media element the editor drives
pub trait PlaybackSurface {
    /// Current playhead position in seconds
    fn current_time(&self) -> TimeSec;

    fn set_current_time(&mut self, time: TimeSec);

    /// Media duration, `None` until metadata is known
    fn duration(&self) -> Option<TimeSec>;

    fn is_paused(&self) -> bool;

    fn play(&mut self);

    fn pause(&mut self);
}

/// Waveform view showing one region per cue
pub trait AnnotationSurface {
    /// Replaces every region with the given set
    fn replace_regions(&mut self, regions: &[Region]);

    /// Moves the waveform cursor to `fraction` of the media length
    fn seek_to_fraction(&mut self, fraction: f64);

    /// Mirrors the player's play/pause state
    fn set_playing(&mut self, _playing: bool) {}
}

/// Receiver of the regenerated caption track
pub trait TrackSink {
    fn attach_track(&mut self, vtt: &str);
}

// =============================================================================
// Headless Player
// =============================================================================

/// In-memory media element
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeadlessPlayer {
    current_time: TimeSec,
    duration: Option<TimeSec>,
    paused: bool,
    track: Option<String>,
    track_attachments: usize,
}

impl HeadlessPlayer {
    /// Creates a paused player at 0s.
    ///
    /// A zero duration is kept: such media has no room for a cue.
    pub fn new(duration: Option<TimeSec>) -> Self {
        Self {
            duration: duration.filter(|d| d.is_finite() && *d >= 0.0),
            paused: true,
            ..Self::default()
        }
    }

    /// Advances the playhead by `delta` seconds while playing; stops at the end.
    pub fn advance(&mut self, delta: TimeSec) {
        if self.paused {
            return;
        }
        self.current_time = clamp_time_sec(self.current_time + delta, self.duration);
        if self.duration.is_some_and(|d| self.current_time >= d) {
            self.paused = true;
        }
    }

    /// Last attached track text
    pub fn track(&self) -> Option<&str> {
        self.track.as_deref()
    }

    pub fn track_attachments(&self) -> usize {
        self.track_attachments
    }
}

impl PlaybackSurface for HeadlessPlayer {
    fn current_time(&self) -> TimeSec {
        self.current_time
    }

    fn set_current_time(&mut self, time: TimeSec) {
        self.current_time = clamp_time_sec(time, self.duration);
    }

    fn duration(&self) -> Option<TimeSec> {
        self.duration
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) {
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }
}

impl TrackSink for HeadlessPlayer {
    fn attach_track(&mut self, vtt: &str) {
        self.track = Some(vtt.to_string());
        self.track_attachments += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_player_starts_paused() {
        let player = HeadlessPlayer::new(Some(30.0));
        assert!(player.is_paused());
        assert_eq!(player.current_time(), 0.0);
        assert_eq!(player.duration(), Some(30.0));
    }

    #[test]
    fn test_headless_player_ignores_bogus_duration() {
        assert_eq!(HeadlessPlayer::new(Some(f64::NAN)).duration(), None);
        assert_eq!(HeadlessPlayer::new(Some(-1.0)).duration(), None);
    }

    #[test]
    fn test_headless_player_keeps_zero_duration() {
        let mut player = HeadlessPlayer::new(Some(0.0));
        assert_eq!(player.duration(), Some(0.0));
        player.set_current_time(5.0);
        assert_eq!(player.current_time(), 0.0);
    }

    #[test]
    fn test_set_current_time_clamps() {
        let mut player = HeadlessPlayer::new(Some(10.0));
        player.set_current_time(12.0);
        assert_eq!(player.current_time(), 10.0);
        player.set_current_time(-1.0);
        assert_eq!(player.current_time(), 0.0);
    }

    #[test]
    fn test_advance_only_while_playing() {
        let mut player = HeadlessPlayer::new(Some(10.0));
        player.advance(1.0);
        assert_eq!(player.current_time(), 0.0);

        player.play();
        player.advance(2.5);
        assert_eq!(player.current_time(), 2.5);

        player.advance(20.0);
        assert_eq!(player.current_time(), 10.0);
        assert!(player.is_paused());
    }

    #[test]
    fn test_attach_track() {
        let mut player = HeadlessPlayer::new(None);
        player.attach_track("WEBVTT\n\n");
        assert_eq!(player.track(), Some("WEBVTT\n\n"));
        assert_eq!(player.track_attachments(), 1);
    }
}
