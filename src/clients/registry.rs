//! Built-in client descriptors.

use std::path::PathBuf;

use crate::dependencies::{KnownFolders, Platform};

/// An external client that can be pointed at the tool-server.
#[derive(Debug, Clone, Copy)]
pub struct ClientDescriptor {
    /// Stable identifier (e.g., "cursor").
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    locate: fn(Platform, &KnownFolders) -> Option<PathBuf>,
}

impl ClientDescriptor {
    /// Where this client keeps its MCP configuration on `platform`.
    pub fn config_path(&self, platform: Platform, folders: &KnownFolders) -> Option<PathBuf> {
        (self.locate)(platform, folders)
    }
}

fn cursor_config(_platform: Platform, folders: &KnownFolders) -> Option<PathBuf> {
    folders
        .home
        .as_ref()
        .map(|home| home.join(".cursor").join("mcp.json"))
}

fn claude_desktop_config(platform: Platform, folders: &KnownFolders) -> Option<PathBuf> {
    const FILE: &str = "claude_desktop_config.json";
    match platform {
        Platform::Windows => folders
            .app_data
            .as_ref()
            .map(|d| d.join("Claude").join(FILE)),
        Platform::MacOs => folders.home.as_ref().map(|home| {
            home.join("Library")
                .join("Application Support")
                .join("Claude")
                .join(FILE)
        }),
        Platform::Linux => folders
            .home
            .as_ref()
            .map(|home| home.join(".config").join("Claude").join(FILE)),
    }
}

fn windsurf_config(_platform: Platform, folders: &KnownFolders) -> Option<PathBuf> {
    folders
        .home
        .as_ref()
        .map(|home| home.join(".codeium").join("windsurf").join("mcp_config.json"))
}

/// Clients toolbridge knows about.
pub const BUILTIN_CLIENTS: &[ClientDescriptor] = &[
    ClientDescriptor {
        id: "cursor",
        name: "Cursor",
        locate: cursor_config,
    },
    ClientDescriptor {
        id: "claude-desktop",
        name: "Claude Desktop",
        locate: claude_desktop_config,
    },
    ClientDescriptor {
        id: "windsurf",
        name: "Windsurf",
        locate: windsurf_config,
    },
];

/// Look up a built-in client by id.
pub fn find_client(id: &str) -> Option<&'static ClientDescriptor> {
    BUILTIN_CLIENTS.iter().find(|c| c.id == id)
}
