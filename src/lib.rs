//! toolbridge - dependency detection and bridge supervision for an MCP
//! tool-server.
//!
//! toolbridge finds a suitable Python interpreter, the `uv` package manager
//! and an optional auxiliary CLI on Windows, macOS and Linux, honoring
//! per-user path overrides. It also manages the lifecycle of the editor
//! bridge process, verifies it with a handshake and ping, and derives the
//! status of each external MCP client from its configuration and the
//! bridge's health.
//!
//! # Modules
//!
//! - [`bridge`] - Bridge lifecycle, transport, verification and supervision
//! - [`cli`] - Command-line interface and argument parsing
//! - [`clients`] - External MCP client status tracking
//! - [`config`] - Persisted settings and typed preferences
//! - [`dependencies`] - Version gate, probing, platform detectors, overrides
//! - [`error`] - Error types and result aliases
//! - [`server`] - Tool-server install state and banner
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use toolbridge::config::MemorySettings;
//! use toolbridge::dependencies::{
//!     DetectionContext, KnownFolders, PathOverrideStore, Platform, PlatformDetector,
//!     ScriptedRunner,
//! };
//!
//! let runner = ScriptedRunner::new()
//!     .with_search_result("python3", "/usr/bin/python3")
//!     .with_output("/usr/bin/python3", "Python 3.12.3");
//! let overrides = PathOverrideStore::load(Arc::new(MemorySettings::new())).unwrap();
//! let ctx = DetectionContext::new(&runner, &overrides);
//!
//! let detector = PlatformDetector::for_platform(Platform::Linux, KnownFolders::default());
//! let python = detector.detect_interpreter(&ctx);
//! assert!(python.is_available);
//! assert_eq!(python.version().unwrap().to_string(), "3.12.3");
//! ```

pub mod bridge;
pub mod cli;
pub mod clients;
pub mod config;
pub mod dependencies;
pub mod error;
pub mod server;
pub mod ui;

pub use error::{Result, ToolbridgeError};
