//! Typed user preferences.
//!
//! The debug-logging flag and the script validation level are read once from
//! the settings backend and written back immediately when changed.

use serde::Serialize;
use std::fmt;

use super::keys;
use super::settings::{SettingValue, SharedSettings};
use crate::error::Result;

/// How strictly scripts are validated by the tool-server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    Basic,
    #[default]
    Standard,
    Comprehensive,
    Strict,
}

impl ValidationLevel {
    /// Convert a stored index, clamping it into `0..=3`.
    pub fn from_index(index: i64) -> Self {
        match index.clamp(0, 3) {
            0 => Self::Basic,
            1 => Self::Standard,
            2 => Self::Comprehensive,
            _ => Self::Strict,
        }
    }

    /// Stored index.
    pub fn index(&self) -> i64 {
        match self {
            Self::Basic => 0,
            Self::Standard => 1,
            Self::Comprehensive => 2,
            Self::Strict => 3,
        }
    }

    /// What this level checks.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Basic => "Only basic syntax checks (braces, quotes, comments)",
            Self::Standard => "Syntax checks + best practices and warnings",
            Self::Comprehensive => "All checks + semantic analysis and performance warnings",
            Self::Strict => "Full semantic validation with namespace/type resolution",
        }
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Basic => "Basic",
            Self::Standard => "Standard",
            Self::Comprehensive => "Comprehensive",
            Self::Strict => "Strict",
        };
        f.write_str(name)
    }
}

/// Debug-logging flag and validation level.
pub struct Preferences {
    backend: SharedSettings,
    debug_logs: bool,
    validation_level: ValidationLevel,
}

impl Preferences {
    /// Load preferences from the backend.
    pub fn load(backend: SharedSettings) -> Result<Self> {
        let debug_logs = backend.get_bool(keys::DEBUG_LOGS, false)?;
        let level = backend.get_int(keys::VALIDATION_LEVEL, ValidationLevel::default().index())?;

        Ok(Self {
            backend,
            debug_logs,
            validation_level: ValidationLevel::from_index(level),
        })
    }

    /// Whether debug logging is enabled.
    pub fn debug_logs(&self) -> bool {
        self.debug_logs
    }

    /// Enable or disable debug logging.
    pub fn set_debug_logs(&mut self, enabled: bool) -> Result<()> {
        self.backend
            .set(keys::DEBUG_LOGS, SettingValue::Bool(enabled))?;
        self.debug_logs = enabled;
        Ok(())
    }

    /// Current validation level.
    pub fn validation_level(&self) -> ValidationLevel {
        self.validation_level
    }

    /// Change the validation level.
    pub fn set_validation_level(&mut self, level: ValidationLevel) -> Result<()> {
        self.backend
            .set(keys::VALIDATION_LEVEL, SettingValue::Int(level.index()))?;
        self.validation_level = level;
        Ok(())
    }
}
