//! Error types for toolbridge operations.
//!
//! This module defines [`ToolbridgeError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Expected absence (missing executable, probe timeout, version too low)
//!   is never an error: it is folded into a normal
//!   [`DependencyStatus`](crate::dependencies::DependencyStatus).
//! - Use `ToolbridgeError` for failures a caller must handle distinctly,
//!   such as an override pointing at a path that does not exist.
//! - Use `anyhow::Error` (via `ToolbridgeError::Other`) for unexpected errors.

use std::path::PathBuf;
use thiserror::Error;

use crate::dependencies::PathOverrideKind;

/// Core error type for toolbridge operations.
#[derive(Debug, Error)]
pub enum ToolbridgeError {
    /// An explicit path override was rejected. Prior state is unchanged.
    #[error("Invalid {kind} override '{path}': {reason}")]
    InvalidOverride {
        kind: PathOverrideKind,
        path: PathBuf,
        reason: String,
    },

    /// Failed to parse the persisted settings file.
    #[error("Failed to parse settings at {path}: {message}")]
    SettingsParseError { path: PathBuf, message: String },

    /// Invalid configuration values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// The bridge process could not be launched.
    #[error("Failed to launch bridge '{program}': {message}")]
    BridgeLaunchFailed { program: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for toolbridge operations.
pub type Result<T> = std::result::Result<T, ToolbridgeError>;
