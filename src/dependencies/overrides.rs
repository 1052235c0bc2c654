//! User-supplied path overrides.
//!
//! An override replaces auto-detection for one tool. Overrides are loaded from
//! the settings backend once, kept in memory, and persisted immediately on
//! every change.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{keys, SettingValue, SharedSettings};
use crate::error::{Result, ToolbridgeError};

/// Which path an override replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathOverrideKind {
    /// The Python interpreter executable.
    Interpreter,
    /// The `uv` executable.
    PackageManager,
    /// The auxiliary client CLI executable.
    AuxiliaryCli,
    /// The tool-server source directory.
    ServerDirectory,
}

impl PathOverrideKind {
    /// All kinds, in display order.
    pub const ALL: [PathOverrideKind; 4] = [
        Self::Interpreter,
        Self::PackageManager,
        Self::AuxiliaryCli,
        Self::ServerDirectory,
    ];

    /// Settings key holding this override.
    pub fn setting_key(&self) -> &'static str {
        match self {
            Self::Interpreter => keys::OVERRIDE_INTERPRETER,
            Self::PackageManager => keys::OVERRIDE_PACKAGE_MANAGER,
            Self::AuxiliaryCli => keys::OVERRIDE_AUXILIARY_CLI,
            Self::ServerDirectory => keys::OVERRIDE_SERVER_DIRECTORY,
        }
    }

    /// Whether the override must point at a directory rather than a file.
    pub fn expects_directory(&self) -> bool {
        matches!(self, Self::ServerDirectory)
    }

    /// Short identifier used on the command line.
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::Interpreter => "interpreter",
            Self::PackageManager => "package-manager",
            Self::AuxiliaryCli => "auxiliary-cli",
            Self::ServerDirectory => "server-directory",
        }
    }

    /// Parse a command-line identifier.
    pub fn from_cli_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.cli_name() == name)
    }
}

impl fmt::Display for PathOverrideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Interpreter => "interpreter",
            Self::PackageManager => "package manager",
            Self::AuxiliaryCli => "auxiliary CLI",
            Self::ServerDirectory => "server directory",
        };
        f.write_str(name)
    }
}

/// In-memory view of the persisted overrides.
pub struct PathOverrideStore {
    backend: SharedSettings,
    overrides: BTreeMap<PathOverrideKind, PathBuf>,
}

impl PathOverrideStore {
    /// Read every override key from `backend`.
    ///
    /// Empty values read as "no override".
    pub fn load(backend: SharedSettings) -> Result<Self> {
        let mut overrides = BTreeMap::new();
        for kind in PathOverrideKind::ALL {
            if let Some(value) = backend.get_string(kind.setting_key())? {
                overrides.insert(kind, PathBuf::from(value));
            }
        }

        tracing::debug!("Loaded {} path override(s)", overrides.len());
        Ok(Self { backend, overrides })
    }

    /// Set an override.
    ///
    /// The path must exist, as a file or (for [`PathOverrideKind::ServerDirectory`])
    /// as a directory. Relative paths are resolved against the current
    /// directory and stored absolute. The new value is persisted before it
    /// takes effect; on any failure the previous override stays in place.
    pub fn set(&mut self, kind: PathOverrideKind, path: impl AsRef<Path>) -> Result<()> {
        validate_override(kind, path.as_ref())?;
        let absolute = std::path::absolute(path.as_ref())?;
        let path = absolute.as_path();

        let text = path.to_string_lossy().into_owned();
        self.backend
            .set(kind.setting_key(), SettingValue::Text(text))?;
        self.overrides.insert(kind, path.to_path_buf());

        tracing::info!("Set {} override to {}", kind, path.display());
        Ok(())
    }

    /// Remove an override. Clearing an unset override is not an error.
    pub fn clear(&mut self, kind: PathOverrideKind) -> Result<()> {
        self.backend.remove(kind.setting_key())?;
        if self.overrides.remove(&kind).is_some() {
            tracing::info!("Cleared {} override", kind);
        }
        Ok(())
    }

    /// The override for `kind`, if set.
    pub fn get(&self, kind: PathOverrideKind) -> Option<&Path> {
        self.overrides.get(&kind).map(PathBuf::as_path)
    }

    /// Whether an override for `kind` is set.
    pub fn has(&self, kind: PathOverrideKind) -> bool {
        self.overrides.contains_key(&kind)
    }

    /// All set overrides, in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (PathOverrideKind, &Path)> {
        self.overrides.iter().map(|(k, p)| (*k, p.as_path()))
    }
}

fn validate_override(kind: PathOverrideKind, path: &Path) -> Result<()> {
    let invalid = |reason: &str| ToolbridgeError::InvalidOverride {
        kind,
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    if path.as_os_str().is_empty() {
        return Err(invalid("path is empty"));
    }

    if kind.expects_directory() {
        if !path.is_dir() {
            return Err(invalid("directory does not exist"));
        }
    } else if !path.is_file() {
        return Err(invalid("file does not exist"));
    }

    Ok(())
}
