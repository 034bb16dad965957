//! Subcommand implementations.
//!
//! Each command returns the text meant for stdout so it can be tested
//! without capturing the process output.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use tokio::sync::broadcast::error::RecvError;

use cuedit_core::events::{event_channel, DEFAULT_EVENT_CAPACITY};
use cuedit_core::fs::validate_output_path;
use cuedit_core::session::{parse_script, EditorSession, LoadReport, ScriptReport};
use cuedit_core::settings::EditorSettings;
use cuedit_core::sync::{table_rows, TableRow};

/// Result of `apply`
#[derive(Debug)]
pub struct ApplyOutcome {
    pub report: ScriptReport,
    /// Encoded result when no output file was given
    pub text: Option<String>,
    /// Change events written to stderr, when `--events` was given
    pub events_printed: Option<usize>,
}

fn load(path: &Path, session: &mut EditorSession) -> anyhow::Result<LoadReport> {
    session
        .load_file(path)
        .with_context(|| format!("Failed to load {}", path.display()))
}

/// `check`: decoded table plus skipped-block diagnostics
pub fn check(path: &Path, json: bool, settings: EditorSettings) -> anyhow::Result<String> {
    let (mut session, _player) = EditorSession::headless(None, settings);
    let report = load(path, &mut session)?;
    let rows = table_rows(session.store());

    if json {
        let value = serde_json::json!({
            "rows": rows,
            "skipped": report.skipped,
        });
        let mut text = serde_json::to_string_pretty(&value)?;
        text.push('\n');
        return Ok(text);
    }

    let mut out = render_table(&rows)?;
    for skipped in &report.skipped {
        writeln!(out, "skipped block at line {}: {}", skipped.line, skipped.reason)?;
    }
    let invalid = rows.iter().filter(|r| r.duration.starts_with('-')).count();
    writeln!(
        out,
        "{} cue(s), {} skipped block(s), {} with invalid timing",
        rows.len(),
        report.skipped.len(),
        invalid
    )?;
    Ok(out)
}

fn render_table(rows: &[TableRow]) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "{:>4}  {:<12}  {:<12}  {:>8}  {:>3}  {:<6}  TEXT",
        "#", "START", "END", "DURATION", "POS", "ALIGN"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:>4}  {:<12}  {:<12}  {:>8}  {:>3}  {:<6}  {}",
            row.sequence_index,
            row.start,
            row.end,
            row.duration,
            row.position,
            row.align,
            row.text.replace('\n', " / ")
        )?;
    }
    Ok(out)
}

/// `normalize`: re-encode; returns the text when no output path is given
pub fn normalize(
    path: &Path,
    output: Option<&str>,
    settings: EditorSettings,
) -> anyhow::Result<Option<String>> {
    let (mut session, _player) = EditorSession::headless(None, settings);
    load(path, &mut session)?;
    write_or_return(&session, output)
}

fn write_or_return(session: &EditorSession, output: Option<&str>) -> anyhow::Result<Option<String>> {
    match output {
        Some(raw) => {
            let out = validate_output_path(raw, "Output path")?;
            session
                .save_vtt(&out)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            Ok(None)
        }
        None => Ok(Some(session.export_vtt())),
    }
}

/// `apply`: replay a script, optionally streaming change events to stderr
pub async fn apply(
    path: &Path,
    script_path: &Path,
    output: Option<&str>,
    media_duration: Option<f64>,
    events: bool,
    settings: EditorSettings,
) -> anyhow::Result<ApplyOutcome> {
    let script = std::fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read script {}", script_path.display()))?;
    let ops = parse_script(&script)
        .with_context(|| format!("Invalid script {}", script_path.display()))?;

    let (mut session, _player) = EditorSession::headless(media_duration, settings);
    load(path, &mut session)?;

    let printer = if events {
        // Each op publishes at most once and the printer only drains after
        // the run yields, so the buffer must hold the whole script.
        let capacity = ops.len().saturating_add(1).max(DEFAULT_EVENT_CAPACITY);
        let (listener, mut receiver) = event_channel(capacity);
        session.subscribe(Box::new(listener));
        Some(tokio::spawn(async move {
            let mut printed = 0usize;
            loop {
                match receiver.recv().await {
                    Ok(event) => match serde_json::to_string(&event) {
                        Ok(line) => {
                            eprintln!("{line}");
                            printed += 1;
                        }
                        Err(e) => tracing::warn!(error = %e, "Failed to serialize event"),
                    },
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Event printer lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            printed
        }))
    } else {
        None
    };

    let report = session.apply_script(&ops)?;
    let text = write_or_return(&session, output)?;

    // Dropping the session closes the channel and ends the printer.
    drop(session);
    let events_printed = match printer {
        Some(printer) => Some(printer.await.context("Event printer task failed")?),
        None => None,
    };

    Ok(ApplyOutcome {
        report,
        text,
        events_printed,
    })
}
