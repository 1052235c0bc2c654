//! Dependency status records.
//!
//! Each detection produces a [`DependencyStatus`] describing whether a tool
//! was found, where, and at which version, or why it wasn't.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::version::Version;

/// The result of detecting a single dependency.
///
/// `version` and `path` are only ever set together through
/// [`DependencyStatus::mark_found`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyStatus {
    /// Display name (e.g., "Python", "uv").
    pub name: String,
    /// Whether the tool-server cannot run without it.
    pub is_required: bool,
    /// Whether an acceptable candidate was found.
    pub is_available: bool,
    /// Detected version.
    version: Option<Version>,
    /// Absolute path of the accepted candidate.
    path: Option<PathBuf>,
    /// Where to get the tool.
    pub installation_hint: String,
    /// Why the tool is unavailable, if it is.
    pub error_message: Option<String>,
    /// Extra human-readable detail.
    pub details: Option<String>,
}

impl DependencyStatus {
    /// Create an unavailable status.
    pub fn new(name: &str, is_required: bool) -> Self {
        Self {
            name: name.to_string(),
            is_required,
            is_available: false,
            version: None,
            path: None,
            installation_hint: String::new(),
            error_message: None,
            details: None,
        }
    }

    /// Set the installation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.installation_hint = hint.into();
        self
    }

    /// Record an accepted candidate.
    pub fn mark_found(&mut self, version: Version, path: &Path, details: impl Into<String>) {
        self.is_available = true;
        self.version = Some(version);
        self.path = Some(path.to_path_buf());
        self.error_message = None;
        self.details = Some(details.into());
    }

    /// Record why nothing was accepted.
    pub fn mark_missing(&mut self, error: impl Into<String>, details: Option<String>) {
        self.is_available = false;
        self.version = None;
        self.path = None;
        self.error_message = Some(error.into());
        self.details = details;
    }

    /// Detected version, if available.
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// Path of the accepted candidate, if available.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether this missing dependency blocks the tool-server.
    pub fn is_blocking(&self) -> bool {
        self.is_required && !self.is_available
    }

    /// One-line summary suitable for terminal output.
    pub fn summary(&self) -> String {
        match (&self.version, &self.path) {
            (Some(version), Some(path)) => {
                format!("{} {} ({})", self.name, version, path.display())
            }
            _ => match &self.error_message {
                Some(err) => format!("{}: {}", self.name, err),
                None => format!("{}: not found", self.name),
            },
        }
    }
}
