//! Cuedit CLI
//!
//! Headless front end for the cue editing engine: inspect, normalize and
//! script edits against WebVTT files.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cuedit_core::logging::{init_logging, LoggingOptions};
use cuedit_core::settings::{default_settings_dir, EditorSettings, SettingsManager};

#[derive(Parser, Debug)]
#[command(name = "cuedit-cli", version, about = "Headless WebVTT cue editor")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to a daily-rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a file and print its cue table
    Check {
        /// WebVTT file
        file: PathBuf,

        /// Print rows and diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode and re-encode a file in canonical form
    Normalize {
        /// WebVTT file
        file: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Run an edit script against a file
    Apply {
        /// WebVTT file
        file: PathBuf,

        /// JSON array of edit operations
        #[arg(long)]
        script: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Media duration in seconds, bounds seeks and inserts
        #[arg(long)]
        media_duration: Option<f64>,

        /// Print every store change as a JSON line on stderr
        #[arg(long)]
        events: bool,
    },
}

fn load_settings(path: Option<PathBuf>) -> EditorSettings {
    let manager = match path {
        Some(path) => SettingsManager::for_file(path),
        None => match default_settings_dir() {
            Some(dir) => SettingsManager::new(dir),
            None => return EditorSettings::default(),
        },
    };
    manager.load()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&LoggingOptions {
        verbose: cli.verbose,
        log_dir: cli.log_dir.clone(),
        stderr: true,
    });
    tracing::debug!(?cli, "Parsed arguments");

    let settings = load_settings(cli.settings);

    match cli.command {
        Commands::Check { file, json } => {
            print!("{}", commands::check(&file, json, settings)?);
        }
        Commands::Normalize { file, output } => {
            if let Some(text) = commands::normalize(&file, output.as_deref(), settings)? {
                print!("{text}");
            }
        }
        Commands::Apply {
            file,
            script,
            output,
            media_duration,
            events,
        } => {
            let outcome = commands::apply(
                &file,
                &script,
                output.as_deref(),
                media_duration,
                events,
                settings,
            )
            .await?;
            for rejected in &outcome.report.rejected {
                eprintln!(
                    "step {} ({}) rejected: {}",
                    rejected.step, rejected.op, rejected.message
                );
            }
            eprintln!(
                "applied {} operation(s), rejected {}",
                outcome.report.applied,
                outcome.report.rejected.len()
            );
            if let Some(text) = outcome.text {
                print!("{text}");
            }
        }
    }

    Ok(())
}
