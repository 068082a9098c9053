// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Neight Contributors

//! Settings management for Neight
//!
//! A [`PreferencesRecord`] is a flat value type persisted as `settings.json`
//! at one of two candidate locations; [`SettingsStore`] picks the location,
//! loads with per-field defaulting, and saves atomically.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

use crate::error::{Result, SettingsError};

mod io;
mod location;
mod migration;
mod validation;

pub use location::{LocationKind, SettingsLocation};
pub use validation::{MAX_FONT_SIZE, MIN_FONT_SIZE, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};

/// File name of the persisted settings record in either candidate directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// File names written by early releases, adopted (and re-saved under
/// [`SETTINGS_FILE_NAME`]) when found and no current file exists.
pub const LEGACY_FILE_NAMES: &[&str] = &["config.json"];

/// Auto-save periods the record may carry, in minutes.
pub const AUTOSAVE_INTERVALS_MINUTES: &[u32] = &[2, 5, 15, 30];

/// User preferences persisted across sessions, stored as a flat JSON object.
///
/// Every field has a default; records with missing or malformed fields load
/// by substituting defaults per field, so loading never fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesRecord {
    /// Document that was open when the editor closed, reopened on start
    #[serde(default)]
    pub last_file: Option<PathBuf>,

    /// Editor font family
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Editor font size in points
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Soft-wrap long lines in the editor widget
    #[serde(default = "default_true")]
    pub word_wrap: bool,

    /// Restored window width in pixels
    #[serde(default = "default_window_width")]
    pub window_width: u32,

    /// Restored window height in pixels
    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Whether the window was maximized on close
    #[serde(default)]
    pub window_maximized: bool,

    /// Auto-save period in minutes, one of [`AUTOSAVE_INTERVALS_MINUTES`]
    #[serde(default = "default_autosave_interval")]
    pub autosave_interval_minutes: u32,

    /// Directory the file dialogs start in
    #[serde(default)]
    pub last_directory: Option<PathBuf>,
}

impl Default for PreferencesRecord {
    fn default() -> Self {
        Self {
            last_file: None,
            font_family: default_font_family(),
            font_size: default_font_size(),
            word_wrap: true,
            window_width: default_window_width(),
            window_height: default_window_height(),
            window_maximized: false,
            autosave_interval_minutes: default_autosave_interval(),
            last_directory: None,
        }
    }
}

/// Where a completed save actually landed, for diagnostics and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Which candidate location was written
    pub location: LocationKind,

    /// Full path of the file that was written
    pub path: PathBuf,

    /// True when a stale primary file seeded the first write at the fallback
    pub migrated_from_primary: bool,
}

/// Persists a [`PreferencesRecord`] at one of two candidate locations.
///
/// The primary candidate is the directory containing the running executable;
/// the fallback is a per-user application-data directory. The store probes
/// primary writability before each save, so an installation moved into a
/// protected folder between runs degrades to the fallback instead of losing
/// preferences.
#[derive(Debug)]
pub struct SettingsStore {
    primary_dir: PathBuf,
    fallback_dir: PathBuf,
    resolved: Mutex<Option<SettingsLocation>>,
    write_lock: Mutex<()>,
}

impl SettingsStore {
    /// Create a store for the given application name.
    ///
    /// Returns [`SettingsError::PathUnresolvable`] only when neither the
    /// executable directory nor a per-user data directory can be determined;
    /// the host may then keep an in-memory record without persistence.
    pub fn new(app_name: &str) -> Result<Self> {
        let primary = location::executable_dir();
        let fallback = location::app_data_dir(app_name);

        let (primary_dir, fallback_dir) = match (primary, fallback) {
            (Some(p), Some(f)) => (p, f),
            (Some(p), None) => {
                warn!(
                    "no per-user data directory available; using {} for both candidates",
                    p.display()
                );
                (p.clone(), p)
            }
            (None, Some(f)) => {
                warn!(
                    "executable directory unavailable; using {} for both candidates",
                    f.display()
                );
                (f.clone(), f)
            }
            (None, None) => {
                return Err(SettingsError::PathUnresolvable(
                    "neither the executable directory nor a per-user data directory \
                     could be determined"
                        .to_string(),
                ))
            }
        };

        Ok(Self::with_dirs(primary_dir, fallback_dir))
    }

    /// Create a store over explicit candidate directories.
    ///
    /// The injection point for hosts that manage their own layout, and the
    /// seam the tests use.
    pub fn with_dirs(primary_dir: impl Into<PathBuf>, fallback_dir: impl Into<PathBuf>) -> Self {
        Self {
            primary_dir: primary_dir.into(),
            fallback_dir: fallback_dir.into(),
            resolved: Mutex::new(None),
            write_lock: Mutex::new(()),
        }
    }
}

// Default value functions
fn default_font_family() -> String {
    "Consolas".to_string()
}

fn default_font_size() -> u32 {
    12
}

fn default_true() -> bool {
    true
}

fn default_window_width() -> u32 {
    1000
}

fn default_window_height() -> u32 {
    650
}

fn default_autosave_interval() -> u32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_default_values() {
        let record = PreferencesRecord::default();
        assert_eq!(record.last_file, None);
        assert_eq!(record.font_family, "Consolas");
        assert_eq!(record.font_size, 12);
        assert!(record.word_wrap);
        assert_eq!(record.window_width, 1000);
        assert_eq!(record.window_height, 650);
        assert!(!record.window_maximized);
        assert_eq!(record.autosave_interval_minutes, 5);
        assert_eq!(record.last_directory, None);
    }

    #[test]
    fn test_empty_object_deserializes_to_defaults() {
        let record: PreferencesRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, PreferencesRecord::default());
    }

    #[test]
    fn test_all_keys_written_on_save() {
        let json = serde_json::to_value(PreferencesRecord::default()).unwrap();
        let map = json.as_object().unwrap();
        for key in [
            "last_file",
            "font_family",
            "font_size",
            "word_wrap",
            "window_width",
            "window_height",
            "window_maximized",
            "autosave_interval_minutes",
            "last_directory",
        ] {
            assert!(map.contains_key(key), "missing key {key}");
        }
    }

    #[test]
    fn test_default_autosave_interval_is_allowed() {
        assert!(AUTOSAVE_INTERVALS_MINUTES.contains(&default_autosave_interval()));
    }
}
