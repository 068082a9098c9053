// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Neight Contributors

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::PoisonError;

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::{Result, SettingsError};

use super::migration;
use super::{
    LocationKind, PreferencesRecord, SaveOutcome, SettingsLocation, SettingsStore,
    LEGACY_FILE_NAMES, SETTINGS_FILE_NAME,
};

impl SettingsStore {
    /// Load the persisted record, or defaults when nothing usable exists.
    ///
    /// The primary file wins on read even when a fallback copy exists (the
    /// more local intent). Corrupt content is logged and recovered as
    /// defaults; this never fails and never panics.
    pub fn load(&self) -> PreferencesRecord {
        let location = self.resolve_location();

        let primary_file = location.primary_file();
        if primary_file.exists() {
            return read_record(&primary_file).unwrap_or_default();
        }

        let fallback_file = location.fallback_file();
        if fallback_file.exists() {
            return read_record(&fallback_file).unwrap_or_default();
        }

        if let Some(record) = self.adopt_legacy_file(&location) {
            return record;
        }

        PreferencesRecord::default()
    }

    /// Load a file written under a name from an early release, re-save it
    /// under the current name, and remove the old file best-effort.
    fn adopt_legacy_file(&self, location: &SettingsLocation) -> Option<PreferencesRecord> {
        for dir in [&location.primary_dir, &location.fallback_dir] {
            for name in LEGACY_FILE_NAMES {
                let path = dir.join(name);
                if !path.exists() {
                    continue;
                }
                let Some(record) = read_record(&path) else {
                    continue;
                };
                info!("adopting legacy settings file {}", path.display());
                match self.save(&record) {
                    Ok(_) => {
                        if let Err(err) = fs::remove_file(&path) {
                            warn!(
                                "could not remove legacy settings file {}: {}",
                                path.display(),
                                err
                            );
                        }
                    }
                    Err(err) => warn!("could not re-save legacy settings: {err}"),
                }
                return Some(record);
            }
        }
        None
    }

    /// Persist the record at the active location.
    ///
    /// Serializes to a temporary file in the target directory and atomically
    /// replaces the target, so the file on disk is always either the old or
    /// the new complete record. A failed write is retried once against the
    /// other candidate before [`SettingsError::WriteFailed`] is returned;
    /// the caller's in-memory record is untouched either way.
    pub fn save(&self, record: &PreferencesRecord) -> Result<SaveOutcome> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Permissions may have changed since the last resolution.
        let location = self.refresh_location();
        let target = location.active_file();

        // Base content keeps unknown keys alive across saves. When the
        // fallback becomes active for the first time, a stale primary file
        // seeds it; the primary copy itself is never modified or deleted.
        let mut migrated_from_primary = false;
        let mut base = read_value(&target).map(migration::migrate_on_load);
        if base.is_none() && location.active == LocationKind::Fallback {
            let stale = location.primary_file();
            if stale.exists() {
                base = read_value(&stale).map(migration::migrate_on_load);
                if base.is_some() {
                    migrated_from_primary = true;
                    info!(
                        "migrating settings from {} to {}",
                        stale.display(),
                        target.display()
                    );
                }
            }
        }

        let new_value = serde_json::to_value(record)?;
        let merged = match base {
            Some(existing) => migration::deep_merge(existing, new_value),
            None => new_value,
        };
        let content = serde_json::to_string_pretty(&merged)?;

        match write_atomic(location.active_dir(), &target, &content) {
            Ok(()) => Ok(SaveOutcome {
                location: location.active,
                path: target,
                migrated_from_primary,
            }),
            Err(first_err) => {
                // A probe can succeed and the write still fail (permissions
                // changed in between); one retry against the other candidate.
                let (retry_kind, retry_dir) = match location.active {
                    LocationKind::Primary => (LocationKind::Fallback, &location.fallback_dir),
                    LocationKind::Fallback => (LocationKind::Primary, &location.primary_dir),
                };
                warn!(
                    "settings write to {} location failed ({}); retrying at {}",
                    location.active, first_err, retry_kind
                );
                if let Err(err) = fs::create_dir_all(retry_dir) {
                    warn!(
                        "could not create {} settings directory {}: {}",
                        retry_kind,
                        retry_dir.display(),
                        err
                    );
                }
                let retry_target = retry_dir.join(SETTINGS_FILE_NAME);
                match write_atomic(retry_dir, &retry_target, &content) {
                    Ok(()) => Ok(SaveOutcome {
                        location: retry_kind,
                        path: retry_target,
                        migrated_from_primary,
                    }),
                    Err(retry_err) => Err(SettingsError::WriteFailed(format!(
                        "{} location: {}; {} location: {}",
                        location.active, first_err, retry_kind, retry_err
                    ))),
                }
            }
        }
    }
}

/// Read a settings file as a raw JSON object.
///
/// `None` for a missing file, unreadable content, or anything that is not an
/// object; the latter two are logged.
fn read_value(path: &Path) -> Option<Value> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!("could not read settings file {}: {}", path.display(), err);
            }
            return None;
        }
    };
    match serde_json::from_str::<Value>(&content) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => {
            warn!(
                "settings file {} is not a JSON object; ignoring it",
                path.display()
            );
            None
        }
        Err(err) => {
            warn!("corrupt settings file {}: {}", path.display(), err);
            None
        }
    }
}

/// Read and interpret a settings file, tolerating legacy shapes and
/// malformed fields.
fn read_record(path: &Path) -> Option<PreferencesRecord> {
    let value = read_value(path)?;
    let value = migration::sanitize_fields(migration::migrate_on_load(value));
    match serde_json::from_value::<PreferencesRecord>(value) {
        Ok(mut record) => {
            record.normalize();
            Some(record)
        }
        Err(err) => {
            warn!(
                "could not interpret settings file {}: {}",
                path.display(),
                err
            );
            None
        }
    }
}

/// Write through a temporary file in the target directory, then rename over
/// the target.
fn write_atomic(dir: &Path, target: &Path, content: &str) -> Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.persist(target)
        .map_err(|err| SettingsError::Io(err.error))?;
    Ok(())
}
