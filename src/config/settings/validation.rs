// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Neight Contributors

//! Field validation and derived accessors for [`PreferencesRecord`].

use std::time::Duration;

use tracing::warn;

use super::{
    default_autosave_interval, default_font_family, default_font_size, default_window_height,
    default_window_width, PreferencesRecord, AUTOSAVE_INTERVALS_MINUTES,
};

/// Smallest font size the editor zoom reaches.
pub const MIN_FONT_SIZE: u32 = 6;

/// Largest font size the editor zoom reaches.
pub const MAX_FONT_SIZE: u32 = 100;

/// Smallest window width worth restoring.
pub const MIN_WINDOW_WIDTH: u32 = 300;

/// Smallest window height worth restoring.
pub const MIN_WINDOW_HEIGHT: u32 = 200;

impl PreferencesRecord {
    /// Replace out-of-range fields with their documented defaults.
    ///
    /// Applied after every load; invalid enumerated or bounded values never
    /// reach the host.
    pub fn normalize(&mut self) {
        if !AUTOSAVE_INTERVALS_MINUTES.contains(&self.autosave_interval_minutes) {
            warn!(
                "autosave_interval_minutes {} is not one of {:?}; using {}",
                self.autosave_interval_minutes,
                AUTOSAVE_INTERVALS_MINUTES,
                default_autosave_interval()
            );
            self.autosave_interval_minutes = default_autosave_interval();
        }
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&self.font_size) {
            warn!(
                "font_size {} is outside {}..={}; using {}",
                self.font_size,
                MIN_FONT_SIZE,
                MAX_FONT_SIZE,
                default_font_size()
            );
            self.font_size = default_font_size();
        }
        if self.window_width < MIN_WINDOW_WIDTH {
            self.window_width = default_window_width();
        }
        if self.window_height < MIN_WINDOW_HEIGHT {
            self.window_height = default_window_height();
        }
        if self.font_family.trim().is_empty() {
            self.font_family = default_font_family();
        }
    }

    /// Auto-save period in the form the host timer wants.
    pub fn autosave_period(&self) -> Duration {
        Duration::from_secs(u64::from(self.autosave_interval_minutes) * 60)
    }

    /// Window geometry to restore, `(width, height)`.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_set_autosave_interval_uses_default() {
        let mut record = PreferencesRecord {
            autosave_interval_minutes: 7,
            ..Default::default()
        };
        record.normalize();
        assert_eq!(record.autosave_interval_minutes, 5);
    }

    #[test]
    fn test_zero_autosave_interval_uses_default() {
        let mut record = PreferencesRecord {
            autosave_interval_minutes: 0,
            ..Default::default()
        };
        record.normalize();
        assert_eq!(record.autosave_interval_minutes, 5);
    }

    #[test]
    fn test_allowed_autosave_intervals_are_kept() {
        for &minutes in AUTOSAVE_INTERVALS_MINUTES {
            let mut record = PreferencesRecord {
                autosave_interval_minutes: minutes,
                ..Default::default()
            };
            record.normalize();
            assert_eq!(record.autosave_interval_minutes, minutes);
        }
    }

    #[test]
    fn test_font_size_out_of_range_uses_default() {
        for size in [0, 3, 101, 9999] {
            let mut record = PreferencesRecord {
                font_size: size,
                ..Default::default()
            };
            record.normalize();
            assert_eq!(record.font_size, 12, "font_size {size}");
        }
    }

    #[test]
    fn test_tiny_window_uses_default_geometry() {
        let mut record = PreferencesRecord {
            window_width: 10,
            window_height: 10,
            ..Default::default()
        };
        record.normalize();
        assert_eq!(record.window_size(), (1000, 650));
    }

    #[test]
    fn test_blank_font_family_uses_default() {
        let mut record = PreferencesRecord {
            font_family: "   ".to_string(),
            ..Default::default()
        };
        record.normalize();
        assert_eq!(record.font_family, "Consolas");
    }

    #[test]
    fn test_valid_record_is_unchanged() {
        let mut record = PreferencesRecord {
            font_size: 18,
            autosave_interval_minutes: 15,
            window_width: 640,
            window_height: 480,
            ..Default::default()
        };
        let before = record.clone();
        record.normalize();
        assert_eq!(record, before);
    }

    #[test]
    fn test_autosave_period() {
        let record = PreferencesRecord {
            autosave_interval_minutes: 2,
            ..Default::default()
        };
        assert_eq!(record.autosave_period(), Duration::from_secs(120));
    }
}
