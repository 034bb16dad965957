//! WebVTT Decoder and Encoder
//!
//! Supports the subset of WebVTT the editor round-trips:
//! - optional `WEBVTT` header and `NOTE` blocks
//! - optional cue identifiers
//! - `position:N%` and `align:start|center|end` cue settings
//!
//! Decoding never fails. Blocks that cannot be read are dropped and
//! reported in [`VttDocument::skipped`].
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::core::cues::{parse_vtt, export_vtt};
//!
//! let cues = parse_vtt(&std::fs::read_to_string("subtitles.vtt")?);
//! let vtt_content = export_vtt(&cues);
//! ```

use serde::{Deserialize, Serialize};

use super::{Cue, CueAlign, DEFAULT_POSITION, MAX_POSITION};
use crate::core::TimeCode;

const HEADER: &str = "WEBVTT";
const NOTE_PREFIX: &str = "NOTE";
const TIMING_ARROW: &str = "-->";

// =============================================================================
// Decode Result
// =============================================================================

/// A block the decoder dropped
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedBlock {
    /// 1-based line number where the block starts
    pub line: usize,
    /// Human-readable reason
    pub reason: String,
}

/// Decoded cues plus diagnostics for dropped blocks
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VttDocument {
    pub cues: Vec<Cue>,
    pub skipped: Vec<SkippedBlock>,
}

// =============================================================================
// Decode
// =============================================================================

/// Parses WebVTT content into cues, dropping malformed blocks silently.
pub fn parse_vtt(content: &str) -> Vec<Cue> {
    decode_vtt(content).cues
}

/// Parses WebVTT content into cues and reports dropped blocks
///
/// # VTT Format
///
/// ```text
/// WEBVTT
///
/// intro
/// 00:00:01.000 --> 00:00:04.000 position:10% align:start
/// First caption text
///
/// 00:05.500 --> 00:08.000
/// Second caption text
/// ```
pub fn decode_vtt(content: &str) -> VttDocument {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    let lines: Vec<&str> = content.lines().collect();
    let mut doc = VttDocument::default();
    let mut i = 0;

    if lines.first().is_some_and(|l| l.contains(HEADER)) {
        i += 1;
    }

    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() {
            i += 1;
            continue;
        }

        if line.starts_with(NOTE_PREFIX) {
            i += 1;
            while i < lines.len() && !lines[i].trim().is_empty() {
                i += 1;
            }
            continue;
        }

        let block_line = i + 1;
        let mut id = None;
        let mut timing = line;
        if !line.contains(TIMING_ARROW) {
            id = Some(line);
            i += 1;
            match lines.get(i).map(|l| l.trim()) {
                Some(next) if next.contains(TIMING_ARROW) => timing = next,
                _ => {
                    tracing::debug!(line = block_line, id = line, "Dropping cue block without timing line");
                    doc.skipped.push(SkippedBlock {
                        line: block_line,
                        reason: format!("identifier '{}' is not followed by a timing line", line),
                    });
                    i += 1;
                    continue;
                }
            }
        }

        let mut cue = parse_timing_line(timing);
        if let Some(id) = id {
            cue.id = Some(id.to_string());
        }
        i += 1;

        let mut payload = Vec::new();
        while i < lines.len() && !lines[i].trim().is_empty() {
            payload.push(lines[i]);
            i += 1;
        }
        cue.text = payload.join("\n").trim().to_string();
        i += 1;

        cue.sequence_index = doc.cues.len() + 1;
        doc.cues.push(cue);
    }

    tracing::debug!(
        cues = doc.cues.len(),
        skipped = doc.skipped.len(),
        "Decoded WebVTT content"
    );
    doc
}

/// Parses `start --> end [key:value ...]` into a cue with empty text.
fn parse_timing_line(line: &str) -> Cue {
    let mut parts = line.split(TIMING_ARROW);
    let start_raw = parts.next().unwrap_or_default().trim();
    let rest = parts.next().unwrap_or_default().trim();

    let mut tokens = rest.split_whitespace();
    let end_raw = tokens.next().unwrap_or_default();

    let mut position = DEFAULT_POSITION;
    let mut align = CueAlign::default();
    for token in tokens {
        if let Some(value) = token.strip_prefix("position:") {
            if let Some(parsed) = parse_int_prefix(value) {
                position = parsed.clamp(0, i64::from(MAX_POSITION)) as u8;
            }
        } else if let Some(value) = token.strip_prefix("align:") {
            match value.parse::<CueAlign>() {
                Ok(parsed) => align = parsed,
                Err(_) => tracing::debug!(value, "Ignoring unsupported cue alignment"),
            }
        }
    }

    Cue::new(TimeCode::parse(start_raw), TimeCode::parse(end_raw), "").with_placement(position, align)
}

/// Reads a leading optionally-signed integer, ignoring any suffix (`"30%"` -> 30).
fn parse_int_prefix(value: &str) -> Option<i64> {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate absurd values; they are clamped into range afterwards.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

// =============================================================================
// Encode
// =============================================================================

/// Exports cues to WebVTT format
///
/// Identifiers are not written back.
pub fn export_vtt(cues: &[Cue]) -> String {
    let blocks: Vec<String> = cues
        .iter()
        .map(|cue| {
            format!(
                "{} {} {} position:{}% align:{}\n{}\n",
                cue.start,
                TIMING_ARROW,
                cue.end,
                cue.position,
                cue.align,
                cue.text
            )
        })
        .collect();

    format!("{HEADER}\n\n{}", blocks.join("\n"))
}

// =============================================================================
// Tests
// =============================================================================
