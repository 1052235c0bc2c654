//! Persisted settings for toolbridge.
//!
//! This module handles:
//! - The key/value storage contract in [`settings`]
//! - Typed user preferences in [`preferences`]
//! - The well-known setting keys in [`keys`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use toolbridge::config::{MemorySettings, Preferences, ValidationLevel};
//!
//! let backend = MemorySettings::new();
//! let mut prefs = Preferences::load(Arc::new(backend.clone())).unwrap();
//! prefs.set_validation_level(ValidationLevel::Strict).unwrap();
//! assert_eq!(backend.write_count(), 1);
//! ```

pub mod preferences;
pub mod settings;

pub use preferences::{Preferences, ValidationLevel};
pub use settings::{FileSettings, MemorySettings, SettingValue, SettingsBackend, SharedSettings};

/// Setting keys.
pub mod keys {
    /// Whether debug logging is enabled (bool).
    pub const DEBUG_LOGS: &str = "toolbridge.debug_logs";
    /// Script validation level (int, 0..=3).
    pub const VALIDATION_LEVEL: &str = "toolbridge.validation_level";
    /// Interpreter path override (string).
    pub const OVERRIDE_INTERPRETER: &str = "toolbridge.override.interpreter";
    /// Package manager path override (string).
    pub const OVERRIDE_PACKAGE_MANAGER: &str = "toolbridge.override.package_manager";
    /// Auxiliary CLI path override (string).
    pub const OVERRIDE_AUXILIARY_CLI: &str = "toolbridge.override.auxiliary_cli";
    /// Server source directory override (string).
    pub const OVERRIDE_SERVER_DIRECTORY: &str = "toolbridge.override.server_directory";
}
