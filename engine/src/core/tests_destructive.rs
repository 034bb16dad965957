//! Destructive and Edge Case Tests for Core Models
//!
//! These tests verify the robustness of the codec and the store against
//! malformed input, stale indices and extreme timestamps.

use crate::core::cues::{decode_vtt, export_vtt, parse_vtt, Cue, CueAlign, CueStore};
use crate::core::{CoreError, TimeCode, TimingField};

fn ms(v: u64) -> TimeCode {
    TimeCode::from_millis(v)
}

#[test]
fn test_destructive_decode_garbage() {
    let doc = decode_vtt("not vtt at all");
    assert!(doc.cues.is_empty());
    assert_eq!(doc.skipped.len(), 1);
    assert_eq!(doc.skipped[0].line, 1);

    assert!(parse_vtt("").is_empty());
    assert!(parse_vtt("WEBVTT").is_empty());
    assert!(parse_vtt("\n\n\n").is_empty());
}

#[test]
fn test_destructive_unreadable_timestamps_become_zero() {
    let cues = parse_vtt("WEBVTT\n\nabc --> def\ntext\n");
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].start(), TimeCode::ZERO);
    assert_eq!(cues[0].end(), TimeCode::ZERO);
    assert_eq!(cues[0].duration(), "0.000");
}

#[test]
fn test_destructive_inverted_cue_is_kept() {
    let cues = parse_vtt("WEBVTT\n\n00:00:05.000 --> 00:00:02.000\nbackwards\n");
    assert_eq!(cues.len(), 1);
    assert!(!cues[0].has_valid_timing());
    assert_eq!(cues[0].duration(), "-3.000");
}

#[test]
fn test_destructive_note_at_end_of_input() {
    let doc = decode_vtt("WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nok\n\nNOTE trailing\nstill a note");
    assert_eq!(doc.cues.len(), 1);
    assert!(doc.skipped.is_empty());
}

#[test]
fn test_destructive_overflowing_timestamp() {
    let cues = parse_vtt("WEBVTT\n\n99999999999999999999:00:00.000 --> 00:00:01.000\nx\n");
    assert_eq!(cues[0].start(), TimeCode::ZERO);
    assert_eq!(cues[0].end(), ms(1_000));

    // Formatting the largest value must not panic.
    let text = TimeCode::from_millis(u64::MAX).format();
    assert!(text.ends_with(".615"));
}

#[test]
fn test_destructive_extreme_settings_values() {
    let cues = parse_vtt(
        "WEBVTT\n\n\
         00:00:01.000 --> 00:00:02.000 position:-20% align:left\na\n\n\
         00:00:03.000 --> 00:00:04.000 position:1000%\nb\n\n\
         00:00:05.000 --> 00:00:06.000 position:abc align:end\nc\n",
    );
    assert_eq!(cues[0].position(), 0);
    assert_eq!(cues[0].align(), CueAlign::Center);
    assert_eq!(cues[1].position(), 100);
    assert_eq!(cues[2].position(), 50);
    assert_eq!(cues[2].align(), CueAlign::End);
}

#[test]
fn test_destructive_crlf_and_unicode() {
    let cues = parse_vtt("WEBVTT\r\n\r\n00:00:01.000 --> 00:00:02.000\r\nHéllo 世界\r\n");
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text(), "Héllo 世界");
}

#[test]
fn test_destructive_stale_indices_leave_store_untouched() {
    let mut store = CueStore::new(vec![Cue::new(ms(0), ms(1_000), "only")]);
    let before = store.clone();

    assert!(matches!(
        store.adjust_timing(1, TimingField::End, "00:00:05.000"),
        Err(CoreError::CueNotFound(1))
    ));
    assert!(store.edit_text(1, "x").is_err());
    assert!(store.set_alignment(1, 10, CueAlign::End).is_err());
    assert!(store.retime(1, ms(0), ms(1)).is_err());
    assert!(store.delete_cue(1).is_err());
    assert!(store.select(Some(1)).is_err());

    assert_eq!(store, before);
}

#[test]
fn test_destructive_garbage_timing_input_is_fail_soft() {
    let mut store = CueStore::new(vec![Cue::new(ms(2_000), ms(4_000), "x")]);

    // Unreadable start parses as zero, which is still before the end.
    assert!(store.adjust_timing(0, TimingField::Start, "??").unwrap());
    assert_eq!(store.cues()[0].start(), TimeCode::ZERO);

    // Unreadable end parses as zero and is rejected.
    assert!(store.adjust_timing(0, TimingField::End, "??").is_err());
    assert_eq!(store.cues()[0].end(), ms(4_000));
}

#[test]
fn test_destructive_position_above_range_rejected() {
    let mut store = CueStore::new(vec![Cue::new(ms(0), ms(1_000), "x")]);
    assert!(matches!(
        store.set_alignment(0, 101, CueAlign::Start),
        Err(CoreError::ValidationError(_))
    ));
    assert_eq!(store.cues()[0].position(), 50);
    assert_eq!(store.cues()[0].align(), CueAlign::Center);
}

#[test]
fn test_destructive_insert_into_zero_length_media() {
    let mut store = CueStore::default();
    let result = store.insert_cue(TimeCode::ZERO, None, ms(1_000), Some(TimeCode::ZERO));
    assert!(matches!(result, Err(CoreError::InvalidTimeRange(..))));
    assert!(store.is_empty());
}

#[test]
fn test_destructive_overlap_fix_is_not_transitive() {
    let mut store = CueStore::new(vec![
        Cue::new(ms(1_000), ms(2_000), "a"),
        Cue::new(ms(2_500), ms(4_000), "b"),
        Cue::new(ms(3_000), ms(5_000), "c"),
    ]);

    store
        .insert_cue(ms(0), Some(0), ms(2_000), None)
        .unwrap();

    // b (fully covered) is gone; c still overlaps the new cue.
    let texts: Vec<&str> = store.cues().iter().map(|c| c.text()).collect();
    assert_eq!(texts, vec!["a", "", "c"]);
    assert_eq!(store.cues()[1].end(), ms(4_000));
    assert_eq!(store.cues()[2].start(), ms(3_000));
}

#[test]
fn test_destructive_delete_everything_then_insert() {
    let mut store = CueStore::new(vec![
        Cue::new(ms(0), ms(1_000), "a"),
        Cue::new(ms(1_000), ms(2_000), "b"),
    ]);
    store.select(Some(1)).unwrap();
    store.delete_cue(1).unwrap();
    store.delete_cue(0).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.selected_index(), None);
    assert!(store.delete_cue(0).is_err());

    let outcome = store.insert_cue(ms(500), None, ms(1_000), None).unwrap();
    assert_eq!(outcome.index, 0);
    assert_eq!(store.cues()[0].sequence_index(), 1);
}

#[test]
fn test_destructive_export_empty_and_identifier_loss() {
    assert_eq!(export_vtt(&[]), "WEBVTT\n\n");

    let cues = parse_vtt("WEBVTT\n\nintro\n00:00:01.000 --> 00:00:02.000\nhello\n");
    assert_eq!(cues[0].id(), Some("intro"));
    assert!(!export_vtt(&cues).contains("intro"));
}

#[test]
fn test_destructive_multiline_payload_survives_reencode() {
    let source = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nline one\nline two\n";
    let cues = parse_vtt(source);
    assert_eq!(cues[0].text(), "line one\nline two");

    let reparsed = parse_vtt(&export_vtt(&cues));
    assert_eq!(reparsed[0].text(), "line one\nline two");
}
