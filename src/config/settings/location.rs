// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Neight Contributors

//! Candidate-path computation and location resolution.
//!
//! Two candidates exist for `settings.json`: the directory containing the
//! running executable (primary) and a per-user application-data directory
//! (fallback). The primary wins whenever a non-destructive write probe
//! against it succeeds.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::PoisonError;

use tracing::{debug, warn};

use super::{SettingsStore, SETTINGS_FILE_NAME};

/// Which of the two candidate locations is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    /// Beside the running executable
    Primary,
    /// Per-user application-data directory
    Fallback,
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationKind::Primary => write!(f, "primary"),
            LocationKind::Fallback => write!(f, "fallback"),
        }
    }
}

/// Snapshot of one location resolution.
///
/// Computed at store creation or on demand and re-probed before every save;
/// installation permissions can change between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsLocation {
    /// Candidate directory beside the executable
    pub primary_dir: PathBuf,

    /// Candidate per-user data directory
    pub fallback_dir: PathBuf,

    /// Result of the write probe against the primary directory
    pub primary_writable: bool,

    /// The candidate chosen by this resolution
    pub active: LocationKind,
}

impl SettingsLocation {
    /// Directory of the active candidate.
    pub fn active_dir(&self) -> &Path {
        match self.active {
            LocationKind::Primary => &self.primary_dir,
            LocationKind::Fallback => &self.fallback_dir,
        }
    }

    /// Settings file path at the primary candidate.
    pub fn primary_file(&self) -> PathBuf {
        self.primary_dir.join(SETTINGS_FILE_NAME)
    }

    /// Settings file path at the fallback candidate.
    pub fn fallback_file(&self) -> PathBuf {
        self.fallback_dir.join(SETTINGS_FILE_NAME)
    }

    /// Settings file path at the active candidate.
    pub fn active_file(&self) -> PathBuf {
        self.active_dir().join(SETTINGS_FILE_NAME)
    }
}

impl SettingsStore {
    /// Resolve the active location, reusing the cached result if present.
    pub fn resolve_location(&self) -> SettingsLocation {
        let mut cache = self.resolved.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(location) = cache.as_ref() {
            return location.clone();
        }
        let location = resolve(&self.primary_dir, &self.fallback_dir);
        *cache = Some(location.clone());
        location
    }

    /// Re-run the write probe and update the cache.
    ///
    /// `save` calls this on every invocation: the app may have been moved
    /// into a protected folder since the last resolution.
    pub fn refresh_location(&self) -> SettingsLocation {
        let location = resolve(&self.primary_dir, &self.fallback_dir);
        let mut cache = self.resolved.lock().unwrap_or_else(PoisonError::into_inner);
        *cache = Some(location.clone());
        location
    }

    /// Path of the settings file currently in effect (diagnostic hook).
    pub fn active_path(&self) -> PathBuf {
        self.resolve_location().active_file()
    }
}

/// Directory containing the running executable, falling back to the working
/// directory when the executable path is unavailable.
pub(super) fn executable_dir() -> Option<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            return Some(parent.to_path_buf());
        }
    }
    std::env::current_dir().ok()
}

/// Per-user application-data directory for the given app name.
///
/// `<APPNAME>_HOME` overrides the platform convention, which is
/// `%LOCALAPPDATA%\<AppName>\` on Windows and `~/.config/<AppName>/`
/// elsewhere.
pub(super) fn app_data_dir(app_name: &str) -> Option<PathBuf> {
    let env_key: String = app_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .chain("_HOME".chars())
        .collect();
    if let Ok(home) = std::env::var(&env_key) {
        if !home.is_empty() {
            return Some(PathBuf::from(home));
        }
    }
    platform_data_dir().map(|base| base.join(app_name))
}

#[cfg(windows)]
fn platform_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir()
}

#[cfg(not(windows))]
fn platform_data_dir() -> Option<PathBuf> {
    dirs::config_dir()
}

/// Probe whether `dir` accepts new files, without leaving residue.
///
/// Creates and deletes a uniquely named marker file. Never panics and never
/// propagates an error: any failure (permission denied, read-only
/// filesystem, directory missing and uncreatable) reports `false`.
fn probe_writable(dir: &Path) -> bool {
    if !dir.is_dir() && fs::create_dir_all(dir).is_err() {
        return false;
    }
    let marker = dir.join(format!(".neight-write-probe-{}", std::process::id()));
    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&marker)
    {
        Ok(file) => {
            drop(file);
            if let Err(err) = fs::remove_file(&marker) {
                warn!(
                    "could not remove write probe marker {}: {}",
                    marker.display(),
                    err
                );
            }
            true
        }
        Err(err) => {
            debug!("write probe failed for {}: {}", dir.display(), err);
            false
        }
    }
}

fn resolve(primary_dir: &Path, fallback_dir: &Path) -> SettingsLocation {
    let primary_writable = probe_writable(primary_dir);
    let active = if primary_writable {
        LocationKind::Primary
    } else {
        if let Err(err) = fs::create_dir_all(fallback_dir) {
            warn!(
                "could not create fallback settings directory {}: {}",
                fallback_dir.display(),
                err
            );
        }
        LocationKind::Fallback
    };
    SettingsLocation {
        primary_dir: primary_dir.to_path_buf(),
        fallback_dir: fallback_dir.to_path_buf(),
        primary_writable,
        active,
    }
}
