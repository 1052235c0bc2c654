//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandContext`] for the settings, platform and process runner
//!   commands share
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::PathBuf;

use crate::cli::args::{Cli, Commands, DoctorArgs};
use crate::config::SharedSettings;
use crate::dependencies::{
    KnownFolders, PathOverrideStore, Platform, PlatformDetector, ProcessRunner, SystemRunner,
};
use crate::error::Result;
use crate::server::resolve_server_dir;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Everything a command reads from the outside world.
pub struct CommandContext {
    pub settings: SharedSettings,
    pub platform: Platform,
    pub folders: KnownFolders,
    pub runner: Box<dyn ProcessRunner>,
}

impl CommandContext {
    /// Context for the current machine and user.
    pub fn system(settings: SharedSettings) -> Self {
        Self {
            settings,
            platform: Platform::current(),
            folders: KnownFolders::detect(),
            runner: Box::new(SystemRunner),
        }
    }

    /// Replace the process runner.
    pub fn with_runner(mut self, runner: Box<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Replace the platform and its folders.
    pub fn with_platform(mut self, platform: Platform, folders: KnownFolders) -> Self {
        self.platform = platform;
        self.folders = folders;
        self
    }

    pub fn detector(&self) -> PlatformDetector {
        PlatformDetector::for_platform(self.platform, self.folders.clone())
    }

    /// Load the persisted path overrides.
    pub fn overrides(&self) -> Result<PathOverrideStore> {
        PathOverrideStore::load(self.settings.clone())
    }

    /// The tool-server source directory, if one can be determined.
    pub fn server_dir(&self, overrides: &PathOverrideStore) -> Option<PathBuf> {
        resolve_server_dir(overrides, &self.folders)
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    context: CommandContext,
}

impl CommandDispatcher {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it. With no subcommand, `doctor` runs.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = &self.context;
        match &cli.command {
            Some(Commands::Doctor(args)) => {
                super::doctor::DoctorCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Override(args)) => {
                super::overrides::OverrideCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Bridge(args)) => {
                super::bridge::BridgeCommand::new(args.clone()).execute(ui)
            }
            Some(Commands::Clients(args)) => {
                super::clients::ClientsCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Settings(args)) => {
                super::settings::SettingsCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Status(args)) => {
                super::status::StatusCommand::new(ctx, args.clone()).execute(ui)
            }
            None => super::doctor::DoctorCommand::new(ctx, DoctorArgs::default()).execute(ui),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemorySettings;
    use crate::dependencies::ScriptedRunner;
    use crate::ui::MockUI;
    use clap::Parser;
    use std::sync::Arc;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn context_builders_replace_parts() {
        let ctx = CommandContext::system(Arc::new(MemorySettings::new()))
            .with_platform(Platform::Linux, KnownFolders::with_home("/home/dev"));
        assert_eq!(ctx.detector().platform(), Platform::Linux);
        assert_eq!(ctx.folders.home, Some(PathBuf::from("/home/dev")));
    }

    #[test]
    fn dispatches_settings_command() {
        let backend = MemorySettings::new();
        let ctx = CommandContext::system(Arc::new(backend.clone()))
            .with_runner(Box::new(ScriptedRunner::new()));
        let dispatcher = CommandDispatcher::new(ctx);
        let cli = Cli::parse_from(["toolbridge", "settings", "validation-level", "3"]);

        let mut ui = MockUI::new();
        let result = dispatcher.dispatch(&cli, &mut ui).unwrap();

        assert!(result.success);
        assert_eq!(backend.write_count(), 1);
    }
}
