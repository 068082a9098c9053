// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Neight Contributors

//! Configuration module for Neight
//!
//! Handles loading, saving, and locating user settings.

pub mod settings;

pub use settings::*;
