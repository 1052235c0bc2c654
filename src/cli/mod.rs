//! Command-line interface for toolbridge.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    BridgeAction, BridgeArgs, ClientsArgs, Cli, Commands, DoctorArgs, OverrideAction,
    OverrideArgs, SettingsAction, SettingsArgs, StatusArgs,
};
pub use commands::{Command, CommandContext, CommandDispatcher, CommandResult};
