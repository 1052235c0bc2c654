//! Status command implementation.
//!
//! The `toolbridge status` command shows the server install state, the
//! active path overrides and the bridge health in one place.

use crate::cli::args::StatusArgs;
use crate::dependencies::PathOverrideKind;
use crate::error::Result;
use crate::server::{DirectoryServerInstall, ServerBanner, ServerInstallQuery};
use crate::ui::{Tone, UserInterface};

use super::bridge::check_running_bridge;
use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display;

/// Version of the server this build ships with.
const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The status command implementation.
pub struct StatusCommand<'a> {
    ctx: &'a CommandContext,
    args: StatusArgs,
}

impl<'a> StatusCommand<'a> {
    pub fn new(ctx: &'a CommandContext, args: StatusArgs) -> Self {
        Self { ctx, args }
    }
}

fn show_server(ui: &mut dyn UserInterface, install: &DirectoryServerInstall) {
    ui.show_header("Server");
    ui.show_detail("Directory", &install.dir().display().to_string());

    match ServerBanner::evaluate(install) {
        Some(banner) if banner.is_error() => ui.show_status(Tone::Error, &banner.message(), None),
        Some(banner) => ui.show_status(Tone::Warning, &banner.message(), None),
        None if install.has_embedded_server() => {
            ui.show_status(Tone::Ok, "Server sources present", None)
        }
        None => ui.show_status(
            Tone::Ok,
            &format!("Server v{} installed", install.package_version()),
            None,
        ),
    }
}

impl Command for StatusCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let overrides = self.ctx.overrides()?;

        match self.ctx.server_dir(&overrides) {
            Some(dir) => show_server(ui, &DirectoryServerInstall::new(dir, PACKAGE_VERSION)),
            None => {
                ui.show_header("Server");
                ui.show_status(Tone::Warning, "Server directory unknown", None);
            }
        }

        ui.show_header("Overrides");
        let mut any = false;
        for (kind, path) in overrides.iter() {
            any = true;
            ui.show_detail(&kind.to_string(), &path.display().to_string());
        }
        if !any {
            ui.message("  None (all paths auto-detected)");
        }

        ui.show_header("Bridge");
        ui.show_detail("Port", &self.args.port.to_string());
        match check_running_bridge(self.args.port)? {
            Some(result) => display::show_bridge_health(ui, &result),
            None => ui.show_status(Tone::Neutral, "Bridge: Not running", None),
        }

        if ui.output_mode().shows_details() && !overrides.has(PathOverrideKind::Interpreter) {
            ui.show_hint("Run `toolbridge doctor` to check the interpreter and package manager");
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::testing::{closed_port, spawn_fake_bridge};
    use crate::config::{keys, MemorySettings, SettingValue};
    use crate::dependencies::{KnownFolders, Platform};
    use crate::server::{INSTALL_ERROR_FILE, VERSION_FILE};
    use crate::ui::MockUI;
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn context(server_dir: &Path) -> CommandContext {
        let backend = MemorySettings::new().with_value(
            keys::OVERRIDE_SERVER_DIRECTORY,
            SettingValue::Text(server_dir.to_string_lossy().into_owned()),
        );
        CommandContext::system(Arc::new(backend))
            .with_platform(Platform::Linux, KnownFolders::default())
    }

    fn run(ctx: &CommandContext, port: u16) -> MockUI {
        let mut ui = MockUI::new();
        StatusCommand::new(ctx, StatusArgs { port })
            .execute(&mut ui)
            .unwrap();
        ui
    }

    #[test]
    fn not_installed_and_bridge_down() {
        let server = TempDir::new().unwrap();
        let ui = run(&context(server.path()), closed_port());

        assert_eq!(ui.status_tone("Server not installed"), Some(Tone::Warning));
        assert_eq!(ui.status_tone("Not running"), Some(Tone::Neutral));
        assert!(ui.detail("server directory").is_some());
    }

    #[test]
    fn install_error_is_shown_as_error() {
        let server = TempDir::new().unwrap();
        fs::write(server.path().join(INSTALL_ERROR_FILE), "uv sync failed").unwrap();
        let ui = run(&context(server.path()), closed_port());

        assert_eq!(
            ui.status_tone("Server installation failed: uv sync failed"),
            Some(Tone::Error)
        );
    }

    #[test]
    fn current_install_with_healthy_bridge() {
        let server = TempDir::new().unwrap();
        fs::write(server.path().join(VERSION_FILE), PACKAGE_VERSION).unwrap();
        let ui = run(&context(server.path()), spawn_fake_bridge(usize::MAX));

        assert_eq!(ui.status_tone("installed"), Some(Tone::Ok));
        assert_eq!(ui.status_tone("Bridge: Healthy"), Some(Tone::Ok));
    }

    #[test]
    fn no_overrides() {
        let ctx = CommandContext::system(Arc::new(MemorySettings::new())).with_platform(
            Platform::Linux,
            KnownFolders {
                local_app_data: Some("/nonexistent/data".into()),
                ..KnownFolders::default()
            },
        );
        let ui = run(&ctx, closed_port());

        assert!(ui.has_message("None (all paths auto-detected)"));
        assert_eq!(
            ui.detail("Directory"),
            Some("/nonexistent/data/UnityMCP/UnityMcpServer/src")
        );
    }
}
