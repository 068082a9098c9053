// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Neight Contributors

//! Error types for settings persistence.
//!
//! Corrupt settings files are deliberately absent here: a parse failure is
//! recovered by per-field defaulting and logged as a warning, never surfaced
//! as an error.

use thiserror::Error;

/// Main error type for settings store operations
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Neither candidate settings directory could be determined
    #[error("settings path unresolvable: {0}")]
    PathUnresolvable(String),

    /// Both the primary and the fallback write attempts failed
    #[error("settings write failed: {0}")]
    WriteFailed(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for settings store operations
pub type Result<T> = std::result::Result<T, SettingsError>;
