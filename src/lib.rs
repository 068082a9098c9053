// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Neight Contributors

//! Settings persistence for the Neight text editor.
//!
//! Neight keeps its preferences in a single flat `settings.json`. This crate
//! owns the part of that story with real invariants:
//! - resolving which of two candidate locations holds the file (beside the
//!   executable when that directory is writable, a per-user data directory
//!   otherwise)
//! - loading a [`PreferencesRecord`] that never fails, defaulting per field
//! - atomic saves, with a fallback retry and a one-time migration when write
//!   permissions change between runs
//!
//! The GUI host wires menus, dialogs and timers and calls [`SettingsStore`]
//! at the edges; nothing here renders text or touches a widget. Persistence
//! failures are never fatal to the host: the editor stays usable with the
//! in-memory record even on a fully unwritable filesystem.

pub mod cli;
pub mod config;
pub mod error;

pub use config::{
    LocationKind, PreferencesRecord, SaveOutcome, SettingsLocation, SettingsStore,
};
pub use error::{Result, SettingsError};
