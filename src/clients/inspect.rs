//! Reading client configuration files.
//!
//! MCP clients keep their servers under a top-level `mcpServers` object:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "unityMCP": {
//!       "command": "uv",
//!       "args": ["run", "--directory", "/path/to/server", "server.py"]
//!     }
//!   }
//! }
//! ```
//!
//! An entry matches when the expected server directory appears in its
//! `args`.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::tracker::ConfigEvidence;

/// Server name used in client configurations.
pub const DEFAULT_SERVER_NAME: &str = "unityMCP";

#[derive(Debug, Deserialize)]
struct ClientConfig {
    #[serde(rename = "mcpServers", default)]
    mcp_servers: HashMap<String, ServerEntry>,
}

#[derive(Debug, Deserialize)]
struct ServerEntry {
    #[serde(default)]
    args: Vec<String>,
}

/// Checks a JSON client config for the tool-server entry.
#[derive(Debug, Clone)]
pub struct JsonConfigInspector {
    server_name: String,
    server_dir: PathBuf,
}

impl JsonConfigInspector {
    pub fn new(server_name: impl Into<String>, server_dir: impl Into<PathBuf>) -> Self {
        Self {
            server_name: server_name.into(),
            server_dir: server_dir.into(),
        }
    }

    /// Inspect the config file at `path`.
    pub fn inspect(&self, path: &Path) -> ConfigEvidence {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return ConfigEvidence::Missing,
            Err(e) => return ConfigEvidence::Unreadable(e.to_string()),
        };
        self.inspect_str(&content)
    }

    /// Inspect config text.
    pub fn inspect_str(&self, content: &str) -> ConfigEvidence {
        if content.trim().is_empty() {
            return ConfigEvidence::Missing;
        }

        let config: ClientConfig = match serde_json::from_str(content) {
            Ok(config) => config,
            Err(e) => return ConfigEvidence::Unreadable(e.to_string()),
        };

        let Some(entry) = config.mcp_servers.get(&self.server_name) else {
            return ConfigEvidence::Missing;
        };

        let expected = normalize(&self.server_dir.to_string_lossy());
        if entry.args.iter().any(|arg| normalize(arg).contains(&expected)) {
            return ConfigEvidence::Matches;
        }

        ConfigEvidence::PathMismatch {
            expected: self.server_dir.clone(),
            found: directory_arg(&entry.args).unwrap_or_else(|| entry.args.join(" ")),
        }
    }
}

/// The value following `--directory`, which is where uv-launched servers
/// name their source folder.
fn directory_arg(args: &[String]) -> Option<String> {
    args.iter()
        .position(|a| a == "--directory")
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// Compare paths independent of separator style and trailing separators.
fn normalize(path: &str) -> String {
    path.replace('\\', "/").trim_end_matches('/').to_string()
}
