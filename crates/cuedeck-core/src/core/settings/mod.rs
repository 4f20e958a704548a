//! Settings Persistence System
//!
//! Provides persistent editor settings with:
//! - Atomic file writes (temp file + rename)
//! - Per-field serde defaults, so older or partial files still load
//! - Normalization that corrects out-of-range values instead of failing
//!
//! Storage location: {config_dir}/settings.json

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::captions::ExportFormat;
use crate::core::fs::{atomic_write_json_pretty, read_text_if_exists};
use crate::core::{CoreResult, TimeSec, DEFAULT_CUE_DURATION_SEC};

/// Settings schema version for migration support
pub const SETTINGS_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE: &str = "settings.json";

/// Placeholder text for split halves left empty
pub const DEFAULT_SPLIT_PLACEHOLDER: &str = "...";

const EXPORT_FORMATS: &[&str] = &["srt", "vtt", "txt", "csv"];

/// Editor settings consumed by the session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditorSettings {
    /// Schema version for migrations
    #[serde(default = "default_version")]
    pub version: u32,

    /// Duration of a cue appended after the last cue
    #[serde(default = "default_cue_duration")]
    pub default_cue_duration_sec: TimeSec,

    /// Text given to a time-split half that would otherwise be empty
    #[serde(default = "default_split_placeholder")]
    pub split_placeholder: String,

    /// Maximum undo depth per track (0 = unbounded)
    #[serde(default)]
    pub history_limit: usize,

    /// Initial state of the track label toggle
    #[serde(default)]
    pub show_track_labels: bool,

    /// Export form used when none is requested (`srt`, `vtt`, `txt`, `csv`)
    #[serde(default = "default_export_format")]
    pub default_export_format: String,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_cue_duration() -> TimeSec {
    DEFAULT_CUE_DURATION_SEC
}

fn default_split_placeholder() -> String {
    DEFAULT_SPLIT_PLACEHOLDER.to_string()
}

fn default_export_format() -> String {
    "srt".to_string()
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            default_cue_duration_sec: default_cue_duration(),
            split_placeholder: default_split_placeholder(),
            history_limit: 0,
            show_track_labels: false,
            default_export_format: default_export_format(),
        }
    }
}

impl EditorSettings {
    /// Normalizes and clamps settings so persisted state is always valid.
    pub fn normalize(&mut self) {
        self.version = SETTINGS_VERSION;
        self.default_cue_duration_sec = clamp_f64(self.default_cue_duration_sec, 0.1, 60.0);
        if self.split_placeholder.trim().is_empty() {
            self.split_placeholder = default_split_placeholder();
        }
        self.history_limit = self.history_limit.min(10_000);
        self.default_export_format = normalize_enum(
            &self.default_export_format,
            EXPORT_FORMATS,
            default_export_format(),
        );
    }

    /// Returns a normalized copy
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Parsed default export format
    pub fn export_format(&self) -> ExportFormat {
        self.default_export_format
            .parse()
            .unwrap_or(ExportFormat::Srt)
    }
}

fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.clamp(min, max)
}

fn normalize_enum(value: &str, allowed: &[&str], fallback: String) -> String {
    if allowed.iter().any(|v| v.eq_ignore_ascii_case(value)) {
        value.to_ascii_lowercase()
    } else {
        fallback
    }
}

/// Settings manager for loading, saving, and resetting settings
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    /// Creates a manager storing `settings.json` under `config_dir`
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self {
            settings_path: config_dir.as_ref().join(SETTINGS_FILE),
        }
    }

    /// Get the settings file path
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Loads settings, falling back to defaults when the file is missing or
    /// unreadable.
    pub fn load(&self) -> EditorSettings {
        match self.try_load() {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                info!("Settings file not found, using defaults");
                EditorSettings::default()
            }
            Err(e) => {
                warn!("Failed to load settings, using defaults: {}", e);
                EditorSettings::default()
            }
        }
    }

    fn try_load(&self) -> CoreResult<Option<EditorSettings>> {
        let Some(content) = read_text_if_exists(&self.settings_path)? else {
            return Ok(None);
        };
        let settings: EditorSettings = serde_json::from_str(&content)?;
        if settings.version < SETTINGS_VERSION {
            info!(
                "Migrating settings from version {} to {}",
                settings.version, SETTINGS_VERSION
            );
        }
        Ok(Some(settings.normalized()))
    }

    /// Normalizes and saves settings atomically, returning what was written
    pub fn save(&self, settings: &EditorSettings) -> CoreResult<EditorSettings> {
        let normalized = settings.clone().normalized();
        atomic_write_json_pretty(&self.settings_path, &normalized)?;
        info!("Settings saved to {:?}", self.settings_path);
        Ok(normalized)
    }

    /// Deletes the settings file and returns defaults
    pub fn reset(&self) -> CoreResult<EditorSettings> {
        if self.settings_path.exists() {
            std::fs::remove_file(&self.settings_path)?;
            info!("Settings file deleted");
        }
        Ok(EditorSettings::default())
    }
}
