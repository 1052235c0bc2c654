//! Clients command implementation.
//!
//! The `toolbridge clients` command reports, per MCP client, whether its
//! configuration points at the tool-server and whether the bridge behind
//! it answers.

use crate::cli::args::ClientsArgs;
use crate::clients::{
    find_client, BridgeEvidence, ClientDescriptor, ClientStatusTracker, ConfigEvidence,
    JsonConfigInspector, BUILTIN_CLIENTS, DEFAULT_SERVER_NAME,
};
use crate::error::Result;
use crate::ui::UserInterface;

use super::bridge::check_running_bridge;
use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display;

/// The clients command implementation.
pub struct ClientsCommand<'a> {
    ctx: &'a CommandContext,
    args: ClientsArgs,
}

impl<'a> ClientsCommand<'a> {
    pub fn new(ctx: &'a CommandContext, args: ClientsArgs) -> Self {
        Self { ctx, args }
    }

    fn selected(&self) -> Option<Vec<&'static ClientDescriptor>> {
        match &self.args.client {
            Some(id) => find_client(id).map(|c| vec![c]),
            None => Some(BUILTIN_CLIENTS.iter().collect()),
        }
    }
}

impl Command for ClientsCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(clients) = self.selected() else {
            let known: Vec<_> = BUILTIN_CLIENTS.iter().map(|c| c.id).collect();
            ui.error(&format!(
                "Unknown client '{}' (known: {})",
                self.args.client.as_deref().unwrap_or_default(),
                known.join(", ")
            ));
            return Ok(CommandResult::failure(2));
        };

        let overrides = self.ctx.overrides()?;
        let Some(server_dir) = self.ctx.server_dir(&overrides) else {
            ui.error("Cannot determine the server directory");
            ui.show_hint("Set one with: toolbridge override set server-directory <path>");
            return Ok(CommandResult::failure(2));
        };

        let bridge = match check_running_bridge(self.args.port)? {
            Some(result) => BridgeEvidence::Verified(result),
            None => BridgeEvidence::NotRunning,
        };

        let inspector = JsonConfigInspector::new(DEFAULT_SERVER_NAME, &server_dir);
        let mut tracker = ClientStatusTracker::new();

        ui.show_header("MCP clients");
        if ui.output_mode().shows_details() {
            ui.show_detail("Server", &server_dir.display().to_string());
        }

        for client in clients {
            let path = client.config_path(self.ctx.platform, &self.ctx.folders);
            let config = path
                .as_deref()
                .map(|p| inspector.inspect(p))
                .unwrap_or(ConfigEvidence::Missing);
            let status = tracker.check_status(client, &config, &bridge);

            display::show_client_status(ui, client.name, status);
            if ui.output_mode().shows_details() {
                if let Some(path) = &path {
                    ui.show_detail("Config", &path.display().to_string());
                }
            }
            match &config {
                ConfigEvidence::PathMismatch { expected, found } => {
                    ui.show_detail("Expected", &expected.display().to_string());
                    ui.show_detail("Found", found);
                }
                ConfigEvidence::Unreadable(reason) => ui.show_detail("Error", reason),
                ConfigEvidence::Missing | ConfigEvidence::Matches => {}
            }
        }

        Ok(CommandResult::success())
    }
}
