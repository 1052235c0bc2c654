//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::bridge::DEFAULT_PORT;
use crate::dependencies::PathOverrideKind;

/// toolbridge - dependency detection and bridge supervision for the MCP tool-server.
#[derive(Debug, Parser)]
#[command(name = "toolbridge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the settings file (overrides the per-user default)
    #[arg(long, global = true, env = "TOOLBRIDGE_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check the interpreter, package manager and auxiliary CLI (default)
    Doctor(DoctorArgs),

    /// Show or change per-user path overrides
    Override(OverrideArgs),

    /// Check on or run the editor bridge
    Bridge(BridgeArgs),

    /// Show whether each MCP client is configured and connected
    Clients(ClientsArgs),

    /// Show or change persisted preferences
    Settings(SettingsArgs),

    /// Show server install state, overrides and bridge health
    Status(StatusArgs),
}

/// Arguments for the `doctor` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `override` command.
#[derive(Debug, Clone, clap::Args)]
pub struct OverrideArgs {
    #[command(subcommand)]
    pub action: OverrideAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum OverrideAction {
    /// List configured overrides
    Show,

    /// Point a tool at an explicit path
    Set {
        /// interpreter, package-manager, auxiliary-cli or server-directory
        #[arg(value_parser = parse_override_kind)]
        kind: PathOverrideKind,

        /// Path to the executable (or directory for server-directory)
        path: PathBuf,
    },

    /// Remove an override and go back to auto-detection
    Clear {
        #[arg(value_parser = parse_override_kind)]
        kind: PathOverrideKind,
    },
}

fn parse_override_kind(value: &str) -> Result<PathOverrideKind, String> {
    PathOverrideKind::from_cli_name(value).ok_or_else(|| {
        let names: Vec<_> = PathOverrideKind::ALL.iter().map(|k| k.cli_name()).collect();
        format!("unknown override '{}' (expected one of: {})", value, names.join(", "))
    })
}

/// Arguments for the `bridge` command.
#[derive(Debug, Clone, clap::Args)]
pub struct BridgeArgs {
    #[command(subcommand)]
    pub action: BridgeAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum BridgeAction {
    /// Verify a bridge that is already listening
    Status(BridgeStatusArgs),

    /// Start a bridge process and supervise it until it exits
    Run(BridgeRunArgs),
}

#[derive(Debug, Clone, clap::Args)]
pub struct BridgeStatusArgs {
    /// Port the bridge listens on
    #[arg(long, default_value_t = DEFAULT_PORT, env = "TOOLBRIDGE_PORT")]
    pub port: u16,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct BridgeRunArgs {
    /// Port the bridge listens on
    #[arg(long, default_value_t = DEFAULT_PORT, env = "TOOLBRIDGE_PORT")]
    pub port: u16,

    /// Milliseconds between status polls
    #[arg(long, default_value_t = 1000)]
    pub tick_ms: u64,

    /// Always spawn, even if something already listens on the port
    #[arg(long)]
    pub no_attach: bool,

    /// Bridge program; `{port}` in its arguments is replaced with the port
    pub program: PathBuf,

    /// Arguments passed to the program
    #[arg(last = true)]
    pub args: Vec<String>,
}

/// Arguments for the `clients` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ClientsArgs {
    /// Port the bridge listens on
    #[arg(long, default_value_t = DEFAULT_PORT, env = "TOOLBRIDGE_PORT")]
    pub port: u16,

    /// Only show this client (cursor, claude-desktop, windsurf)
    #[arg(long)]
    pub client: Option<String>,
}

/// Arguments for the `settings` command.
#[derive(Debug, Clone, clap::Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub action: Option<SettingsAction>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum SettingsAction {
    /// Show all preferences (default)
    Show,

    /// Turn persisted debug logging on or off
    Debug {
        #[arg(value_parser = parse_switch, action = clap::ArgAction::Set)]
        enabled: bool,
    },

    /// Set the validation level (0 basic, 1 standard, 2 comprehensive, 3 strict)
    ValidationLevel { level: i64 },
}

fn parse_switch(value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(format!("expected on or off, got '{}'", value)),
    }
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, clap::Args)]
pub struct StatusArgs {
    /// Port the bridge listens on
    #[arg(long, default_value_t = DEFAULT_PORT, env = "TOOLBRIDGE_PORT")]
    pub port: u16,
}
