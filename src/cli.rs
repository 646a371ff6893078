// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - serve [--demo]: run the site (default when no subcommand is given)
// - seed: insert demo content into the configured database
// - config --show: Display effective configuration
// - config --reset: Regenerate config file with defaults
// - config --path: Show config file path

use crate::config::{Config, VERSION};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;

/// OTT Trendy - review site with threaded comments
#[derive(Parser)]
#[command(name = "ott-trendy")]
#[command(version = VERSION)]
#[command(about = "OTT review site with threaded comments", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the site server
    Serve {
        /// Serve demo content from an in-memory database
        #[arg(long)]
        demo: bool,
    },

    /// Insert demo posts and comments into the configured database
    Seed,

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// What main should do after argument parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Serve { demo: bool },
    Seed,
}

impl Commands {
    /// Resolve to an action for main, handling `config` in place (`None`)
    fn into_action(self) -> anyhow::Result<Option<Action>> {
        match self {
            Commands::Serve { demo } => Ok(Some(Action::Serve { demo })),
            Commands::Seed => Ok(Some(Action::Seed)),
            Commands::Config { show, reset, path } => {
                if path {
                    handle_config_path()?;
                } else if show {
                    handle_config_show()?;
                } else if reset {
                    handle_config_reset()?;
                } else {
                    // No flag provided, show help
                    println!("Usage: ott-trendy config [--show|--reset|--path]");
                    println!();
                    println!("Options:");
                    println!("  --show    Display effective configuration");
                    println!("  --reset   Reset config file to defaults");
                    println!("  --path    Show config file path");
                }
                Ok(None)
            }
        }
    }
}

/// Parse arguments. Returns `None` when a command was fully handled here.
pub fn handle_cli() -> anyhow::Result<Option<Action>> {
    let cli = Cli::parse();
    match cli.command {
        Some(command) => command.into_action(),
        None => Ok(Some(Action::Serve { demo: false })),
    }
}

fn handle_config_path() -> anyhow::Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    // Show source info
    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
    Ok(())
}

fn handle_config_reset() -> anyhow::Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    // Confirm if file exists
    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating directory {}", parent.display()))?;
    }

    // Write the default config (using Config's single source of truth)
    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Error writing config {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}
