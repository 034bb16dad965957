//! Settings Persistence System
//!
//! Provides persistent editor settings with:
//! - Atomic file writes (temp file + rename)
//! - Schema validation with defaults
//! - Migration support for schema changes
//!
//! Storage location: {config_dir}/cuedit/settings.json

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{
    fs::atomic_write_json_pretty,
    sync::{RegionPalette, DEFAULT_REGION_COLOR, DEFAULT_SELECTED_REGION_COLOR},
    CoreError, CoreResult, TimeCode, TimeSec,
};

/// Settings schema version for migration support
pub const SETTINGS_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE: &str = "settings.json";

/// Lock file name (advisory lock to prevent concurrent writers)
pub const SETTINGS_LOCK_FILE: &str = "settings.json.lock";

/// Application directory name under the platform config dir
pub const APP_DIR_NAME: &str = "cuedit";

/// Editor settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditorSettings {
    /// Schema version for migrations
    #[serde(default = "default_version")]
    pub version: u32,

    /// Editing settings
    #[serde(default)]
    pub editing: EditingSettings,

    /// Playback settings
    #[serde(default)]
    pub playback: PlaybackSettings,

    /// Appearance settings
    #[serde(default)]
    pub appearance: AppearanceSettings,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            editing: EditingSettings::default(),
            playback: PlaybackSettings::default(),
            appearance: AppearanceSettings::default(),
        }
    }
}

impl EditorSettings {
    /// Normalizes and clamps settings so persisted state is always valid.
    ///
    /// Bad values are corrected rather than rejected, so an old or
    /// hand-edited file still loads.
    pub fn normalize(&mut self) {
        self.version = SETTINGS_VERSION;

        self.editing.default_cue_duration_sec =
            clamp_f64(self.editing.default_cue_duration_sec, 0.1, 60.0);

        self.playback.seek_step_sec = clamp_f64(self.playback.seek_step_sec, 0.05, 60.0);
        self.playback.wheel_step_sec = clamp_f64(self.playback.wheel_step_sec, 0.01, 10.0);

        if self.appearance.region_color.trim().is_empty() {
            self.appearance.region_color = default_region_color();
        }
        if self.appearance.selected_region_color.trim().is_empty() {
            self.appearance.selected_region_color = default_selected_region_color();
        }
    }

    /// Span given to newly inserted cues
    pub fn default_cue_span(&self) -> TimeCode {
        TimeCode::from_secs_f64(self.editing.default_cue_duration_sec)
    }

    /// Region colors for the waveform view
    pub fn region_palette(&self) -> RegionPalette {
        RegionPalette {
            normal: self.appearance.region_color.clone(),
            selected: self.appearance.selected_region_color.clone(),
        }
    }
}

fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.clamp(min, max)
}

/// Editing settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditingSettings {
    /// Length of a newly inserted cue, in seconds
    #[serde(default = "default_cue_duration")]
    pub default_cue_duration_sec: TimeSec,
}

impl Default for EditingSettings {
    fn default() -> Self {
        Self {
            default_cue_duration_sec: default_cue_duration(),
        }
    }
}

fn default_cue_duration() -> TimeSec {
    1.0
}

/// Playback settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSettings {
    /// Seek button step, in seconds
    #[serde(default = "default_seek_step")]
    pub seek_step_sec: TimeSec,

    /// Mouse wheel step over the waveform, in seconds
    #[serde(default = "default_wheel_step")]
    pub wheel_step_sec: TimeSec,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            seek_step_sec: default_seek_step(),
            wheel_step_sec: default_wheel_step(),
        }
    }
}

fn default_seek_step() -> TimeSec {
    1.0
}

fn default_wheel_step() -> TimeSec {
    0.2
}

/// Appearance settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettings {
    /// Fill of unselected waveform regions
    #[serde(default = "default_region_color")]
    pub region_color: String,

    /// Fill of the selected waveform region
    #[serde(default = "default_selected_region_color")]
    pub selected_region_color: String,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            region_color: default_region_color(),
            selected_region_color: default_selected_region_color(),
        }
    }
}

fn default_region_color() -> String {
    DEFAULT_REGION_COLOR.to_string()
}

fn default_selected_region_color() -> String {
    DEFAULT_SELECTED_REGION_COLOR.to_string()
}

// =============================================================================
// Settings Manager
// =============================================================================

/// Default settings directory (`{config_dir}/cuedit`), if the platform has one
pub fn default_settings_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME))
}

/// Settings manager for loading, saving, and resetting settings
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    /// Create a new settings manager with the given settings directory
    pub fn new(settings_dir: PathBuf) -> Self {
        Self {
            settings_path: settings_dir.join(SETTINGS_FILE),
        }
    }

    /// Create a manager for an explicit settings file
    pub fn for_file(settings_path: PathBuf) -> Self {
        Self { settings_path }
    }

    fn lock_path(&self) -> PathBuf {
        self.settings_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(SETTINGS_LOCK_FILE)
    }

    fn with_lock<T>(
        &self,
        exclusive: bool,
        op: impl FnOnce() -> CoreResult<T>,
    ) -> CoreResult<T> {
        if let Some(parent) = self.settings_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    CoreError::SettingsError(format!("Failed to create settings directory: {}", e))
                })?;
            }
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(|e| {
                CoreError::SettingsError(format!("Failed to open settings lock file: {}", e))
            })?;

        let locked = if exclusive {
            fs2::FileExt::lock_exclusive(&lock_file)
        } else {
            fs2::FileExt::lock_shared(&lock_file)
        };
        locked.map_err(|e| CoreError::SettingsError(format!("Failed to lock settings: {}", e)))?;

        let result = op();

        if let Err(e) = fs2::FileExt::unlock(&lock_file) {
            warn!("Failed to unlock settings lock file: {}", e);
        }

        result
    }

    /// Get the settings file path
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk, returning defaults if missing or unreadable
    pub fn load(&self) -> EditorSettings {
        let result = self.with_lock(false, || {
            if !self.settings_path.exists() {
                info!("Settings file not found, using defaults");
                return Ok(EditorSettings::default());
            }

            let content = fs::read_to_string(&self.settings_path)?;
            let mut settings = serde_json::from_str::<EditorSettings>(&content)?;

            if settings.version < SETTINGS_VERSION {
                info!(
                    "Migrating settings from version {} to {}",
                    settings.version, SETTINGS_VERSION
                );
                settings = self.migrate(settings);
            }

            settings.normalize();
            Ok(settings)
        });

        match result {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load settings, using defaults: {}", e);
                EditorSettings::default()
            }
        }
    }

    /// Save settings to disk using atomic write; returns what was persisted
    pub fn save(&self, settings: &EditorSettings) -> CoreResult<EditorSettings> {
        self.with_lock(true, || {
            let mut normalized = settings.clone();
            normalized.normalize();

            atomic_write_json_pretty(&self.settings_path, &normalized)?;

            info!("Settings saved to {:?}", self.settings_path);
            Ok(normalized)
        })
    }

    /// Reset settings to defaults and delete the settings file
    pub fn reset(&self) -> CoreResult<EditorSettings> {
        self.with_lock(true, || {
            if self.settings_path.exists() {
                fs::remove_file(&self.settings_path)?;
                info!("Settings file deleted");
            }
            Ok(EditorSettings::default())
        })
    }

    /// Migrate settings from older version
    fn migrate(&self, mut settings: EditorSettings) -> EditorSettings {
        settings.version = SETTINGS_VERSION;
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ============================================================
    // Defaults and Normalization
    // ============================================================

    #[test]
    fn test_default_settings() {
        let settings = EditorSettings::default();

        assert_eq!(settings.version, SETTINGS_VERSION);
        assert!((settings.editing.default_cue_duration_sec - 1.0).abs() < 1e-9);
        assert!((settings.playback.seek_step_sec - 1.0).abs() < 1e-9);
        assert!((settings.playback.wheel_step_sec - 0.2).abs() < 1e-9);
        assert_eq!(settings.appearance.region_color, "rgba(100,100,100,0.2)");
        assert_eq!(
            settings.appearance.selected_region_color,
            "rgba(50,150,255,0.4)"
        );
        assert_eq!(settings.default_cue_span(), TimeCode::from_millis(1_000));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "playback": { "wheelStepSec": 0.5 } }"#;
        let settings: EditorSettings = serde_json::from_str(json).unwrap();

        assert!((settings.playback.wheel_step_sec - 0.5).abs() < 1e-9);
        assert!((settings.playback.seek_step_sec - 1.0).abs() < 1e-9);
        assert_eq!(settings.editing, EditingSettings::default());
        assert_eq!(settings.version, SETTINGS_VERSION);
    }

    #[test]
    fn test_normalize_clamps_out_of_range_values() {
        let mut settings = EditorSettings::default();
        settings.editing.default_cue_duration_sec = 500.0;
        settings.playback.seek_step_sec = -2.0;
        settings.playback.wheel_step_sec = f64::NAN;
        settings.appearance.region_color = "   ".to_string();

        settings.normalize();

        assert!((settings.editing.default_cue_duration_sec - 60.0).abs() < 1e-9);
        assert!((settings.playback.seek_step_sec - 0.05).abs() < 1e-9);
        assert!((settings.playback.wheel_step_sec - 0.01).abs() < 1e-9);
        assert_eq!(settings.appearance.region_color, DEFAULT_REGION_COLOR);
    }

    #[test]
    fn test_region_palette_from_settings() {
        let mut settings = EditorSettings::default();
        settings.appearance.selected_region_color = "#ff0000".to_string();

        let palette = settings.region_palette();

        assert_eq!(palette.normal, DEFAULT_REGION_COLOR);
        assert_eq!(palette.selected, "#ff0000");
    }

    // ============================================================
    // SettingsManager Tests
    // ============================================================

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(temp_dir.path().to_path_buf());

        assert_eq!(manager.load(), EditorSettings::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(temp_dir.path().to_path_buf());

        let mut settings = EditorSettings::default();
        settings.editing.default_cue_duration_sec = 2.5;
        settings.playback.seek_step_sec = 5.0;

        let saved = manager.save(&settings).unwrap();
        let loaded = manager.load();

        assert_eq!(saved, loaded);
        assert!((loaded.editing.default_cue_duration_sec - 2.5).abs() < 1e-9);
        assert!(manager.settings_path().exists());
    }

    #[test]
    fn test_save_normalizes() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(temp_dir.path().to_path_buf());

        let mut settings = EditorSettings::default();
        settings.playback.wheel_step_sec = 99.0;

        let saved = manager.save(&settings).unwrap();

        assert!((saved.playback.wheel_step_sec - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_corrupted_file_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(temp_dir.path().to_path_buf());
        std::fs::write(manager.settings_path(), "{ not json").unwrap();

        assert_eq!(manager.load(), EditorSettings::default());
    }

    #[test]
    fn test_load_migrates_old_version() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(temp_dir.path().to_path_buf());
        std::fs::write(
            manager.settings_path(),
            r#"{ "version": 0, "editing": { "defaultCueDurationSec": 3.0 } }"#,
        )
        .unwrap();

        let loaded = manager.load();

        assert_eq!(loaded.version, SETTINGS_VERSION);
        assert!((loaded.editing.default_cue_duration_sec - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_deletes_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(temp_dir.path().to_path_buf());
        manager.save(&EditorSettings::default()).unwrap();
        assert!(manager.settings_path().exists());

        let reset = manager.reset().unwrap();

        assert_eq!(reset, EditorSettings::default());
        assert!(!manager.settings_path().exists());
    }

    #[test]
    fn test_for_file_uses_exact_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.json");
        let manager = SettingsManager::for_file(path.clone());

        manager.save(&EditorSettings::default()).unwrap();

        assert!(path.exists());
    }
}
