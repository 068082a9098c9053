// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Neight Contributors

//! neight-settings - settings utility for the Neight text editor
//!
//! Entry point for the diagnostic CLI: shows where the settings file lives,
//! prints the effective record, and resets it to defaults.

use anyhow::Context;
use clap::Parser;

use neight_settings::cli::{Cli, Commands, ResetArgs};
use neight_settings::config::{PreferencesRecord, SettingsStore};

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    // Practical debug toggle: `-v` enables store diagnostics without
    // requiring users to know target names up front. `RUST_LOG` still takes
    // precedence.
    if cli.verbose > 0 {
        if let Ok(directive) = "neight_settings=debug".parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = SettingsStore::new(&cli.app_name)
        .with_context(|| format!("could not locate settings for {}", cli.app_name))?;

    match cli.command.unwrap_or(Commands::Where) {
        Commands::Where => run_where(&store),
        Commands::Show => run_show(&store),
        Commands::Reset(args) => run_reset(&store, args),
    }
}

/// Print both candidate locations, primary writability, and the active path.
fn run_where(store: &SettingsStore) -> anyhow::Result<()> {
    let location = store.refresh_location();

    println!("Primary location (application folder):");
    println!("  {}", location.primary_file().display());
    println!(
        "  writable: {}",
        if location.primary_writable {
            "yes"
        } else {
            "no (fallback in use)"
        }
    );
    println!();
    println!("Fallback location (per-user data):");
    println!("  {}", location.fallback_file().display());
    println!();

    if location.primary_file().exists() {
        println!("Settings file found at the primary location.");
    } else if location.fallback_file().exists() {
        println!("Settings file found at the fallback location.");
    } else {
        println!("No settings file yet; one will be created on first save.");
    }
    println!();
    println!("Active path:");
    println!("  {}", location.active_file().display());

    Ok(())
}

fn run_show(store: &SettingsStore) -> anyhow::Result<()> {
    let record = store.load();
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn run_reset(store: &SettingsStore, args: ResetArgs) -> anyhow::Result<()> {
    if !args.yes {
        anyhow::bail!("refusing to overwrite settings without --yes");
    }
    let outcome = store.save(&PreferencesRecord::default())?;
    println!(
        "Settings reset at {} ({} location)",
        outcome.path.display(),
        outcome.location
    );
    Ok(())
}
