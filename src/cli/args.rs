// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Neight Contributors

//! CLI argument definitions using Clap
//!
//! Defines the arguments and subcommands for the settings utility.

use clap::{Parser, Subcommand};

/// neight-settings - inspect and manage Neight editor settings
#[derive(Parser, Debug)]
#[command(name = "neight-settings")]
#[command(version, about = "Inspect and manage Neight editor settings")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Application name used for the per-user data directory
    #[arg(long, global = true, default_value = "Neight")]
    pub app_name: String,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the candidate settings locations and which one is active
    /// (default when no command given)
    #[command(alias = "location")]
    Where,

    /// Print the effective settings record as JSON
    Show,

    /// Overwrite the settings file with defaults
    Reset(ResetArgs),
}

/// Arguments for the reset subcommand
#[derive(clap::Args, Debug)]
pub struct ResetArgs {
    /// Confirm the overwrite
    #[arg(long)]
    pub yes: bool,
}
