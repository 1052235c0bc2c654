//! External MCP client status.
//!
//! Tracks whether each known client (Cursor, Claude Desktop, Windsurf) is
//! configured for the tool-server and whether it can reach it through the
//! bridge.

pub mod inspect;
pub mod registry;
pub mod status;
pub mod tracker;

pub use inspect::{JsonConfigInspector, DEFAULT_SERVER_NAME};
pub use registry::{find_client, ClientDescriptor, BUILTIN_CLIENTS};
pub use status::{ClientStatus, StatusTier};
pub use tracker::{
    derive_status, BridgeEvidence, ClientConfigurator, ClientStatusTracker, ConfigEvidence,
};
