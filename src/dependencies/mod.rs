//! Toolchain detection.
//!
//! Locates the Python interpreter, the `uv` package manager and the
//! auxiliary client CLI the tool-server needs:
//! - Version parsing and gating in [`version`]
//! - Bounded subprocess probes in [`probe`]
//! - The shared search-then-validate algorithm in [`search`]
//! - Per-platform candidate lists in [`platform`]
//! - User path overrides in [`overrides`]
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use toolbridge::config::MemorySettings;
//! use toolbridge::dependencies::{
//!     DetectionContext, PathOverrideStore, PlatformDetector, SystemRunner,
//! };
//!
//! let overrides = PathOverrideStore::load(Arc::new(MemorySettings::new())).unwrap();
//! let runner = SystemRunner;
//! let ctx = DetectionContext::new(&runner, &overrides);
//!
//! let python = PlatformDetector::current().detect_interpreter(&ctx);
//! println!("{}", python.summary());
//! ```

pub mod overrides;
pub mod platform;
pub mod probe;
pub mod search;
pub mod status;
pub mod version;

pub use overrides::{PathOverrideKind, PathOverrideStore};
pub use platform::{KnownFolders, Platform, PlatformDetector};
pub use probe::{ProbeOutput, ProcessRunner, ScriptedRunner, SystemRunner};
pub use search::{detect_tool, DetectionContext, ProbeTimeouts, ToolSpec};
pub use status::DependencyStatus;
pub use version::{Version, VersionParseError, VersionPolicy};
