//! View Projections
//!
//! Pure snapshots of the store shaped for each external view, plus the
//! listener adapters that push them to annotation and track surfaces.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::{StoreChanged, StoreListener};
use crate::core::{
    cues::{export_vtt, CueAlign, CueStore},
    playback::{AnnotationSurface, TrackSink},
    CueIndex, TimeSec, TimingField,
};

/// Region fill for unselected cues
pub const DEFAULT_REGION_COLOR: &str = "rgba(100,100,100,0.2)";

/// Region fill for the selected cue
pub const DEFAULT_SELECTED_REGION_COLOR: &str = "rgba(50,150,255,0.4)";

// =============================================================================
// Table
// =============================================================================

/// One row of the editable cue table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub index: CueIndex,
    pub sequence_index: usize,
    pub start: String,
    pub end: String,
    pub duration: String,
    pub text: String,
    pub position: u8,
    pub align: CueAlign,
    pub selected: bool,
    pub start_error: bool,
    pub end_error: bool,
}

/// Projects every cue into a table row
pub fn table_rows(store: &CueStore) -> Vec<TableRow> {
    let field_error = store.field_error();
    let has_error = |index: CueIndex, field: TimingField| {
        field_error.is_some_and(|e| e.index == index && e.field == field)
    };

    store
        .cues()
        .iter()
        .enumerate()
        .map(|(i, cue)| TableRow {
            index: i,
            sequence_index: cue.sequence_index(),
            start: cue.start().format(),
            end: cue.end().format(),
            duration: cue.duration(),
            text: cue.text().to_string(),
            position: cue.position(),
            align: cue.align(),
            selected: store.selection().is_selected(i),
            start_error: has_error(i, TimingField::Start),
            end_error: has_error(i, TimingField::End),
        })
        .collect()
}

// =============================================================================
// Regions
// =============================================================================

/// Region fill colors
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionPalette {
    pub normal: String,
    pub selected: String,
}

impl Default for RegionPalette {
    fn default() -> Self {
        Self {
            normal: DEFAULT_REGION_COLOR.to_string(),
            selected: DEFAULT_SELECTED_REGION_COLOR.to_string(),
        }
    }
}

/// A draggable, resizable annotation over the waveform
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    pub index: CueIndex,
    pub start: TimeSec,
    pub end: TimeSec,
    pub content: String,
    pub color: String,
    pub aria_label: String,
    pub selected: bool,
}

/// Projects every cue into a waveform region
pub fn regions(store: &CueStore, palette: &RegionPalette) -> Vec<Region> {
    store
        .cues()
        .iter()
        .enumerate()
        .map(|(i, cue)| {
            let selected = store.selection().is_selected(i);
            Region {
                id: region_id(i),
                index: i,
                start: cue.start_sec(),
                end: cue.end_sec(),
                content: format!("#{}\t{}", i + 1, cue.text()),
                color: if selected {
                    palette.selected.clone()
                } else {
                    palette.normal.clone()
                },
                aria_label: format!("Subtitle region {}: {}", i + 1, cue.text()),
                selected,
            }
        })
        .collect()
}

/// Stable region identifier for list position `index`
pub fn region_id(index: CueIndex) -> String {
    format!("sub_{index}")
}

/// Reverse of [`region_id`]
pub fn parse_region_id(id: &str) -> Option<CueIndex> {
    id.strip_prefix("sub_")?.parse().ok()
}

// =============================================================================
// Access list
// =============================================================================

/// Keyboard-navigable mirror of the cue list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessItem {
    pub index: CueIndex,
    pub label: String,
    pub seek_sec: TimeSec,
    pub selected: bool,
}

pub fn access_items(store: &CueStore) -> Vec<AccessItem> {
    store
        .cues()
        .iter()
        .enumerate()
        .map(|(i, cue)| AccessItem {
            index: i,
            label: format!("#{} {}", i + 1, cue.text()),
            seek_sec: cue.start_sec(),
            selected: store.selection().is_selected(i),
        })
        .collect()
}

// =============================================================================
// Playback track
// =============================================================================

/// Regenerated WebVTT text for the playback track
pub fn track_text(store: &CueStore) -> String {
    export_vtt(store.cues())
}

// =============================================================================
// Adapters
// =============================================================================

/// Regenerates waveform annotations after every change
pub struct RegionLayer {
    surface: Rc<RefCell<dyn AnnotationSurface>>,
    palette: RegionPalette,
}

impl RegionLayer {
    pub fn new(surface: Rc<RefCell<dyn AnnotationSurface>>, palette: RegionPalette) -> Self {
        Self { surface, palette }
    }
}

impl StoreListener for RegionLayer {
    fn on_store_changed(&mut self, _event: &StoreChanged, store: &CueStore) {
        // Rejected drags re-render too, snapping the region back.
        let regions = regions(store, &self.palette);
        self.surface.borrow_mut().replace_regions(&regions);
    }
}

/// Re-attaches the regenerated track after every change
pub struct TrackLayer {
    sink: Rc<RefCell<dyn TrackSink>>,
}

impl TrackLayer {
    pub fn new(sink: Rc<RefCell<dyn TrackSink>>) -> Self {
        Self { sink }
    }
}

impl StoreListener for TrackLayer {
    fn on_store_changed(&mut self, event: &StoreChanged, store: &CueStore) {
        if event.is_rejection() {
            return;
        }
        self.sink.borrow_mut().attach_track(&track_text(store));
    }
}

// =============================================================================
// Tests
// =============================================================================
