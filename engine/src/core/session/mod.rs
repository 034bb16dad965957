//! Editor Session
//!
//! The context object a host drives. It owns the cue store, the command
//! executor (and with it the listener list), the media player, the
//! optional waveform, settings and the single boundary watch.
//!
//! Every gesture either forwards to a command, and so publishes through
//! the executor, or only moves the playhead. Playhead moves never
//! publish store events.

mod script;

pub use script::*;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{
    clamp_time_sec,
    commands::{
        AdjustTimingCommand, Command, CommandExecutor, CommandResult, DeleteCueCommand,
        EditTextCommand, InsertCueCommand, LoadCuesCommand, RetimeCueCommand, SelectCueCommand,
        SetAlignmentCommand, StateChange,
    },
    cues::{decode_vtt, CueAlign, CueStore, SkippedBlock},
    fs::{atomic_write_text, read_subtitle_file},
    playback::{
        AnnotationSurface, BoundaryWatch, HeadlessPlayer, PlaybackSurface, TrackSink, WatchTick,
    },
    settings::EditorSettings,
    sync::{regions, track_text, RegionLayer, StoreListener, TrackLayer},
    CoreError, CoreResult, CueIndex, SessionId, SubscriptionId, TimeCode, TimeSec, TimingField,
};

/// Summary of a load
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub cue_count: usize,
    pub skipped: Vec<SkippedBlock>,
}

/// Subtitle editing session
pub struct EditorSession {
    id: SessionId,
    store: CueStore,
    executor: CommandExecutor,
    player: Rc<RefCell<dyn PlaybackSurface>>,
    waveform: Option<Rc<RefCell<dyn AnnotationSurface>>>,
    settings: EditorSettings,
    watch: Option<BoundaryWatch>,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("id", &self.id)
            .field("cues", &self.store.len())
            .field("selected", &self.store.selected_index())
            .field("watch", &self.watch)
            .finish()
    }
}

impl EditorSession {
    /// Creates an empty session driving `player`
    pub fn new(player: Rc<RefCell<dyn PlaybackSurface>>, settings: EditorSettings) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            store: CueStore::default(),
            executor: CommandExecutor::new(),
            player,
            waveform: None,
            settings,
            watch: None,
        }
    }

    /// Creates a session over an in-memory player that also receives the track
    pub fn headless(
        duration: Option<TimeSec>,
        settings: EditorSettings,
    ) -> (Self, Rc<RefCell<HeadlessPlayer>>) {
        let player = Rc::new(RefCell::new(HeadlessPlayer::new(duration)));
        let mut session = Self::new(player.clone(), settings);
        session.attach_track_sink(player.clone());
        (session, player)
    }

    // -------------------------------------------------------------------------
    // Wiring
    // -------------------------------------------------------------------------

    /// Connects the waveform view; regions are rendered now and after every change
    pub fn attach_waveform(&mut self, surface: Rc<RefCell<dyn AnnotationSurface>>) -> SubscriptionId {
        let palette = self.settings.region_palette();
        surface
            .borrow_mut()
            .replace_regions(&regions(&self.store, &palette));
        self.waveform = Some(surface.clone());
        self.executor
            .subscribe(Box::new(RegionLayer::new(surface, palette)))
    }

    /// Connects a caption track receiver; attached now and after every change
    pub fn attach_track_sink(&mut self, sink: Rc<RefCell<dyn TrackSink>>) -> SubscriptionId {
        sink.borrow_mut().attach_track(&track_text(&self.store));
        self.executor.subscribe(Box::new(TrackLayer::new(sink)))
    }

    pub fn subscribe(&mut self, listener: Box<dyn StoreListener>) -> SubscriptionId {
        self.executor.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.executor.unsubscribe(id)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn store(&self) -> &CueStore {
        &self.store
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    pub fn player(&self) -> &Rc<RefCell<dyn PlaybackSurface>> {
        &self.player
    }

    /// The live boundary watch, if any
    pub fn watch(&self) -> Option<&BoundaryWatch> {
        self.watch.as_ref()
    }

    fn execute(&mut self, command: impl Command + 'static) -> CoreResult<CommandResult> {
        self.executor.execute(Box::new(command), &mut self.store)
    }

    // -------------------------------------------------------------------------
    // Loading and saving
    // -------------------------------------------------------------------------

    /// Replaces the cue list with decoded `text`; selection is cleared
    pub fn load_vtt(&mut self, text: &str) -> CoreResult<LoadReport> {
        self.cancel_watch();
        let document = decode_vtt(text);
        let cue_count = document.cues.len();
        self.execute(LoadCuesCommand::new(document.cues))?;

        info!(
            session = %self.id,
            cues = cue_count,
            skipped = document.skipped.len(),
            "Loaded subtitles"
        );
        Ok(LoadReport {
            cue_count,
            skipped: document.skipped,
        })
    }

    /// Reads and loads a subtitle file
    pub fn load_file(&mut self, path: &Path) -> CoreResult<LoadReport> {
        let text = read_subtitle_file(path)?;
        self.load_vtt(&text)
    }

    /// Current cue list as WebVTT text
    pub fn export_vtt(&self) -> String {
        track_text(&self.store)
    }

    /// Writes the current cue list to `path` atomically
    pub fn save_vtt(&self, path: &Path) -> CoreResult<()> {
        atomic_write_text(path, &self.export_vtt())?;
        info!(path = %path.display(), cues = self.store.len(), "Saved subtitles");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Edits
    // -------------------------------------------------------------------------

    pub fn adjust_timing(
        &mut self,
        index: CueIndex,
        field: TimingField,
        raw_value: &str,
    ) -> CoreResult<CommandResult> {
        self.execute(AdjustTimingCommand::new(index, field, raw_value))
    }

    pub fn edit_text(&mut self, index: CueIndex, text: &str) -> CoreResult<CommandResult> {
        self.execute(EditTextCommand::new(index, text))
    }

    pub fn set_alignment(
        &mut self,
        index: CueIndex,
        position: u8,
        align: CueAlign,
    ) -> CoreResult<CommandResult> {
        self.execute(SetAlignmentCommand::new(index, position, align))
    }

    pub fn delete_cue(&mut self, index: CueIndex) -> CoreResult<CommandResult> {
        self.execute(DeleteCueCommand::new(index))
    }

    /// Deletes the selected cue; `Ok(None)` when nothing is selected
    pub fn delete_selected(&mut self) -> CoreResult<Option<CommandResult>> {
        match self.store.selected_index() {
            Some(index) => self.delete_cue(index).map(Some),
            None => Ok(None),
        }
    }

    pub fn select(&mut self, index: Option<CueIndex>) -> CoreResult<CommandResult> {
        self.execute(SelectCueCommand::new(index))
    }

    /// Inserts a cue at the playhead and selects it; returns its index
    pub fn insert_cue(&mut self) -> CoreResult<CueIndex> {
        let (now, duration) = {
            let player = self.player.borrow();
            (player.current_time(), player.duration())
        };
        let command = InsertCueCommand::new(
            TimeCode::from_secs_f64(now),
            self.store.selected_index(),
        )
        .with_span(self.settings.default_cue_span())
        .with_media_duration(duration.map(TimeCode::from_secs_f64))
        .selecting_inserted();

        let result = self.execute(command)?;
        result
            .changes
            .iter()
            .find_map(|change| match change {
                StateChange::CueInserted { index } => Some(*index),
                _ => None,
            })
            .ok_or_else(|| CoreError::Internal("Insert reported no new cue".to_string()))
    }

    /// Commits a region drag or resize
    pub fn on_region_updated(
        &mut self,
        index: CueIndex,
        start: TimeSec,
        end: TimeSec,
    ) -> CoreResult<CommandResult> {
        self.execute(RetimeCueCommand::new(
            index,
            TimeCode::from_secs_f64(start),
            TimeCode::from_secs_f64(end),
        ))
    }

    // -------------------------------------------------------------------------
    // Selection and seeking
    // -------------------------------------------------------------------------

    /// Selects `index` and seeks to `time`, keeping the play/pause state
    pub fn select_and_seek(&mut self, index: CueIndex, time: TimeSec) -> CoreResult<()> {
        self.execute(SelectCueCommand::new(Some(index)))?;

        let was_playing = !self.player.borrow().is_paused();
        self.seek_to(time);
        let mut player = self.player.borrow_mut();
        if was_playing {
            player.play();
        } else {
            player.pause();
        }
        Ok(())
    }

    /// Double click on a region: seek to the click, clamped into the region
    pub fn on_region_double_click(&mut self, index: CueIndex, click_time: TimeSec) -> CoreResult<()> {
        let cue = self.store.get(index).ok_or(CoreError::CueNotFound(index))?;
        let (start, end) = (cue.start_sec(), cue.end_sec());
        let time = if click_time.is_nan() {
            start
        } else {
            click_time.max(start).min(end)
        };
        self.select_and_seek(index, time)
    }

    /// Double click on a table row: seek to the cue start without selecting
    pub fn on_row_double_click(&mut self, index: CueIndex) -> CoreResult<()> {
        let start = self.cue_start(index)?;
        self.seek_to(start);
        Ok(())
    }

    /// Focus on an access list item: seek only
    pub fn on_access_focus(&mut self, index: CueIndex) -> CoreResult<()> {
        self.on_row_double_click(index)
    }

    /// Activation (Enter, Space, click) on an access list item
    pub fn on_access_activate(&mut self, index: CueIndex) -> CoreResult<()> {
        let start = self.cue_start(index)?;
        self.select_and_seek(index, start)
    }

    fn cue_start(&self, index: CueIndex) -> CoreResult<TimeSec> {
        self.store
            .get(index)
            .map(|cue| cue.start_sec())
            .ok_or(CoreError::CueNotFound(index))
    }

    /// Moves the playhead and the waveform cursor
    fn seek_to(&mut self, time: TimeSec) {
        let position = {
            let mut player = self.player.borrow_mut();
            player.set_current_time(time);
            player.current_time()
        };
        self.sync_waveform(position);
    }

    fn sync_waveform(&self, time: TimeSec) {
        let Some(waveform) = &self.waveform else {
            return;
        };
        if let Some(duration) = self.player.borrow().duration().filter(|d| *d > 0.0) {
            waveform.borrow_mut().seek_to_fraction(time / duration);
        }
    }

    /// Relative seek clamped into `[0, duration]`; ignored until the duration is known
    pub fn seek_by(&mut self, delta: TimeSec) -> bool {
        let (now, duration) = {
            let player = self.player.borrow();
            (player.current_time(), player.duration())
        };
        let Some(duration) = duration else {
            return false;
        };
        self.seek_to(clamp_time_sec(now + delta, Some(duration)));
        true
    }

    /// Seek button press by the configured step
    pub fn on_seek_button(&mut self, forward: bool) -> bool {
        let step = self.settings.playback.seek_step_sec;
        self.seek_by(if forward { step } else { -step })
    }

    /// Wheel over the waveform: scrolling up moves forward
    pub fn on_wheel(&mut self, delta_y: f64) -> bool {
        let step = self.settings.playback.wheel_step_sec;
        self.seek_by(if delta_y < 0.0 { step } else { -step })
    }

    /// Flips play/pause and mirrors it onto the waveform; returns true when now playing
    pub fn toggle_playback(&mut self) -> bool {
        let (playing, position) = {
            let mut player = self.player.borrow_mut();
            if player.is_paused() {
                player.play();
            } else {
                player.pause();
            }
            (!player.is_paused(), player.current_time())
        };
        if let Some(waveform) = &self.waveform {
            waveform.borrow_mut().set_playing(playing);
        }
        self.sync_waveform(position);
        playing
    }

    /// Media time update: moves the waveform cursor and returns the cue
    /// under the playhead for highlighting
    pub fn on_time_update(&mut self) -> Option<CueIndex> {
        let now = self.player.borrow().current_time();
        self.sync_waveform(now);
        self.store.cue_at(TimeCode::from_secs_f64(now))
    }

    // -------------------------------------------------------------------------
    // Play selected
    // -------------------------------------------------------------------------

    /// Plays the selected cue and stops at its end; false when nothing is selected
    pub fn play_selected(&mut self) -> bool {
        let Some(index) = self.store.selected_index() else {
            return false;
        };
        let Some(cue) = self.store.get(index) else {
            return false;
        };
        let (start, end) = (cue.start_sec(), cue.end_sec());

        self.cancel_watch();
        self.seek_to(start);
        self.player.borrow_mut().play();
        self.watch = Some(BoundaryWatch::start(index, end));
        debug!(index, start, end, "Playing selected cue");
        true
    }

    /// Per-frame hook; ticks the boundary watch if one is live
    pub fn on_frame(&mut self) -> Option<WatchTick> {
        let tick = {
            let watch = self.watch.as_ref()?;
            let mut player = self.player.borrow_mut();
            watch.tick(&mut *player)
        };
        if tick != WatchTick::Running {
            if tick == WatchTick::Finished {
                let position = self.player.borrow().current_time();
                self.sync_waveform(position);
            }
            self.watch = None;
        }
        Some(tick)
    }

    /// Cancels the live boundary watch, if any
    pub fn cancel_watch(&mut self) {
        if let Some(watch) = self.watch.take() {
            watch.cancel();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sync::{Region, StoreChanged};

    const SAMPLE: &str = "WEBVTT

00:00:01.000 --> 00:00:04.000
Hello

00:00:05.000 --> 00:00:08.000 position:20% align:start
World
";

    #[derive(Default)]
    struct RecordingWaveform {
        regions: Vec<Region>,
        fractions: Vec<f64>,
        playing: Option<bool>,
    }

    impl AnnotationSurface for RecordingWaveform {
        fn replace_regions(&mut self, regions: &[Region]) {
            self.regions = regions.to_vec();
        }

        fn seek_to_fraction(&mut self, fraction: f64) {
            self.fractions.push(fraction);
        }

        fn set_playing(&mut self, playing: bool) {
            self.playing = Some(playing);
        }
    }

    fn loaded_session() -> (EditorSession, Rc<RefCell<HeadlessPlayer>>) {
        let (mut session, player) = EditorSession::headless(Some(20.0), EditorSettings::default());
        session.load_vtt(SAMPLE).unwrap();
        (session, player)
    }

    fn event_log(session: &mut EditorSession) -> Rc<RefCell<Vec<StoreChanged>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.subscribe(Box::new(move |event: &StoreChanged, _: &CueStore| {
            sink.borrow_mut().push(event.clone())
        }));
        events
    }

    #[test]
    fn test_load_replaces_cues_and_attaches_track() {
        let (session, player) = loaded_session();

        assert_eq!(session.store().len(), 2);
        assert_eq!(session.store().selected_index(), None);
        assert_eq!(player.borrow().track(), Some(session.export_vtt().as_str()));
        // Once at attach time, once after load.
        assert_eq!(player.borrow().track_attachments(), 2);
    }

    #[test]
    fn test_load_reports_skipped_blocks() {
        let (mut session, _player) = EditorSession::headless(None, EditorSettings::default());
        let report = session
            .load_vtt("WEBVTT\n\nintro\nnot a timing line\n\n00:00:01.000 --> 00:00:02.000\nok\n")
            .unwrap();

        assert_eq!(report.cue_count, 1);
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn test_reload_clears_selection() {
        let (mut session, _player) = loaded_session();
        session.select(Some(1)).unwrap();

        session.load_vtt(SAMPLE).unwrap();

        assert_eq!(session.store().selected_index(), None);
    }

    #[test]
    fn test_insert_uses_playhead_and_selects() {
        let (mut session, player) = loaded_session();
        player.borrow_mut().set_current_time(9.0);

        let index = session.insert_cue().unwrap();

        assert_eq!(index, 2);
        assert_eq!(session.store().selected_index(), Some(2));
        let cue = &session.store().cues()[2];
        assert_eq!(cue.start(), TimeCode::from_millis(9_000));
        assert_eq!(cue.end(), TimeCode::from_millis(10_000));
    }

    #[test]
    fn test_insert_at_media_end_is_rejected() {
        let (mut session, player) = loaded_session();
        player.borrow_mut().set_current_time(20.0);

        let err = session.insert_cue().unwrap_err();

        assert!(matches!(err, CoreError::InvalidTimeRange(..)));
        assert_eq!(session.store().len(), 2);
    }

    #[test]
    fn test_insert_clamps_to_media_duration() {
        let (mut session, player) = loaded_session();
        player.borrow_mut().set_current_time(19.5);

        let index = session.insert_cue().unwrap();

        assert_eq!(
            session.store().cues()[index].end(),
            TimeCode::from_millis(20_000)
        );
    }

    #[test]
    fn test_insert_into_zero_length_media_is_rejected() {
        let (mut session, player) = EditorSession::headless(Some(0.0), EditorSettings::default());
        assert_eq!(player.borrow().duration(), Some(0.0));

        let err = session.insert_cue().unwrap_err();

        assert!(matches!(err, CoreError::InvalidTimeRange(..)));
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_insert_uses_configured_span() {
        let mut settings = EditorSettings::default();
        settings.editing.default_cue_duration_sec = 2.5;
        let (mut session, player) = EditorSession::headless(Some(60.0), settings);
        player.borrow_mut().set_current_time(30.0);

        let index = session.insert_cue().unwrap();

        assert_eq!(session.store().cues()[index].duration(), "2.500");
    }

    #[test]
    fn test_each_edit_publishes_once() {
        let (mut session, _player) = loaded_session();
        let events = event_log(&mut session);

        session.edit_text(0, "Hi").unwrap();
        session
            .adjust_timing(1, TimingField::End, "00:00:09.000")
            .unwrap();
        session.edit_text(0, "Hi").unwrap();

        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn test_rejected_drag_keeps_timing() {
        let (mut session, _player) = loaded_session();
        let events = event_log(&mut session);

        assert!(session.on_region_updated(0, 3.0, 2.0).is_err());

        assert_eq!(session.store().cues()[0].start(), TimeCode::from_millis(1_000));
        assert!(events.borrow()[0].is_rejection());
    }

    #[test]
    fn test_region_drag_retimes() {
        let (mut session, _player) = loaded_session();

        session.on_region_updated(0, 1.5, 4.25).unwrap();

        let cue = &session.store().cues()[0];
        assert_eq!(cue.start(), TimeCode::from_millis(1_500));
        assert_eq!(cue.end(), TimeCode::from_millis(4_250));
    }

    #[test]
    fn test_delete_selected() {
        let (mut session, _player) = loaded_session();
        assert!(session.delete_selected().unwrap().is_none());

        session.select(Some(0)).unwrap();
        session.delete_selected().unwrap();

        assert_eq!(session.store().len(), 1);
        assert_eq!(session.store().cues()[0].text(), "World");
        assert_eq!(session.store().selected_index(), None);
    }

    #[test]
    fn test_waveform_follows_store() {
        let (mut session, _player) = loaded_session();
        let waveform = Rc::new(RefCell::new(RecordingWaveform::default()));
        session.attach_waveform(waveform.clone());
        assert_eq!(waveform.borrow().regions.len(), 2);

        session.select(Some(1)).unwrap();

        let regions = waveform.borrow().regions.clone();
        assert!(regions[1].selected);
        assert_eq!(regions[1].color, "rgba(50,150,255,0.4)");
    }

    #[test]
    fn test_region_double_click_clamps_and_preserves_pause() {
        let (mut session, player) = loaded_session();
        let waveform = Rc::new(RefCell::new(RecordingWaveform::default()));
        session.attach_waveform(waveform.clone());

        session.on_region_double_click(1, 12.0).unwrap();

        assert_eq!(session.store().selected_index(), Some(1));
        assert_eq!(player.borrow().current_time(), 8.0);
        assert!(player.borrow().is_paused());
        assert_eq!(waveform.borrow().fractions.last(), Some(&0.4));
    }

    #[test]
    fn test_select_and_seek_keeps_playing() {
        let (mut session, player) = loaded_session();
        player.borrow_mut().play();

        session.on_access_activate(0).unwrap();

        assert_eq!(session.store().selected_index(), Some(0));
        assert_eq!(player.borrow().current_time(), 1.0);
        assert!(!player.borrow().is_paused());
    }

    #[test]
    fn test_row_double_click_seeks_without_selecting() {
        let (mut session, player) = loaded_session();

        session.on_row_double_click(1).unwrap();
        assert_eq!(player.borrow().current_time(), 5.0);
        assert_eq!(session.store().selected_index(), None);

        session.on_access_focus(0).unwrap();
        assert_eq!(player.borrow().current_time(), 1.0);

        assert!(matches!(
            session.on_row_double_click(5),
            Err(CoreError::CueNotFound(5))
        ));
    }

    #[test]
    fn test_play_selected_stops_at_end() {
        let (mut session, player) = loaded_session();
        assert!(!session.play_selected());

        session.select(Some(0)).unwrap();
        assert!(session.play_selected());
        assert_eq!(player.borrow().current_time(), 1.0);
        assert!(!player.borrow().is_paused());

        player.borrow_mut().advance(2.0);
        assert_eq!(session.on_frame(), Some(WatchTick::Running));

        player.borrow_mut().advance(1.5);
        assert_eq!(session.on_frame(), Some(WatchTick::Finished));
        assert!(player.borrow().is_paused());
        assert_eq!(player.borrow().current_time(), 4.0);
        assert_eq!(session.on_frame(), None);
    }

    #[test]
    fn test_play_selected_cancels_previous_watch() {
        let (mut session, _player) = loaded_session();
        session.select(Some(0)).unwrap();
        session.play_selected();
        let first = session.watch().map(|w| w.handle()).unwrap();

        session.select(Some(1)).unwrap();
        session.play_selected();

        assert!(!first.is_active());
        assert_eq!(session.watch().map(|w| w.index()), Some(1));
    }

    #[test]
    fn test_seek_by_and_wheel_clamp() {
        let (mut session, player) = loaded_session();

        assert!(session.seek_by(-5.0));
        assert_eq!(player.borrow().current_time(), 0.0);

        assert!(session.on_seek_button(true));
        assert_eq!(player.borrow().current_time(), 1.0);

        assert!(session.on_wheel(-100.0));
        assert!((player.borrow().current_time() - 1.2).abs() < 1e-9);

        assert!(session.on_wheel(3.0));
        assert!((player.borrow().current_time() - 1.0).abs() < 1e-9);

        assert!(session.seek_by(100.0));
        assert_eq!(player.borrow().current_time(), 20.0);
    }

    #[test]
    fn test_seek_ignored_without_duration() {
        let (mut session, player) = EditorSession::headless(None, EditorSettings::default());
        assert!(!session.seek_by(1.0));
        assert!(!session.on_wheel(-1.0));
        assert_eq!(player.borrow().current_time(), 0.0);
    }

    #[test]
    fn test_seek_does_not_publish() {
        let (mut session, _player) = loaded_session();
        let events = event_log(&mut session);

        session.seek_by(2.0);
        session.on_row_double_click(0).unwrap();
        session.toggle_playback();

        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_toggle_playback() {
        let (mut session, player) = loaded_session();
        assert!(session.toggle_playback());
        assert!(!player.borrow().is_paused());
        assert!(!session.toggle_playback());
        assert!(player.borrow().is_paused());
    }

    #[test]
    fn test_toggle_playback_mirrors_onto_waveform() {
        let (mut session, player) = loaded_session();
        let waveform = Rc::new(RefCell::new(RecordingWaveform::default()));
        session.attach_waveform(waveform.clone());
        player.borrow_mut().set_current_time(5.0);

        session.toggle_playback();
        assert_eq!(waveform.borrow().playing, Some(true));
        assert_eq!(waveform.borrow().fractions.last(), Some(&0.25));

        session.toggle_playback();
        assert_eq!(waveform.borrow().playing, Some(false));
    }

    #[test]
    fn test_time_update_highlights_cue_under_playhead() {
        let (mut session, player) = loaded_session();
        let waveform = Rc::new(RefCell::new(RecordingWaveform::default()));
        session.attach_waveform(waveform.clone());
        let events = event_log(&mut session);

        player.borrow_mut().set_current_time(6.0);
        assert_eq!(session.on_time_update(), Some(1));
        assert_eq!(waveform.borrow().fractions.last(), Some(&0.3));

        player.borrow_mut().set_current_time(4.5);
        assert_eq!(session.on_time_update(), None);
        assert_eq!(waveform.borrow().fractions.last(), Some(&0.225));

        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.vtt");
        let (mut session, _player) = loaded_session();
        session.edit_text(0, "Changed").unwrap();

        session.save_vtt(&path).unwrap();

        let (mut reloaded, _p) = EditorSession::headless(None, EditorSettings::default());
        reloaded.load_file(&path).unwrap();
        assert_eq!(reloaded.store().cues()[0].text(), "Changed");
        assert_eq!(reloaded.store().cues()[1].position(), 20);
        assert_eq!(reloaded.export_vtt(), session.export_vtt());
    }
}
