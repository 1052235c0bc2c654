//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`toolbridge doctor`, `toolbridge status`)
//! - One [`CommandContext`] holding settings, platform and process runner
//! - Consistent global flag handling

pub mod bridge;
pub mod clients;
pub mod dispatcher;
pub mod display;
pub mod doctor;
pub mod overrides;
pub mod settings;
pub mod status;

pub use dispatcher::{Command, CommandContext, CommandDispatcher, CommandResult};
