use std::path::PathBuf;

use super::{KnownFolders, AUXILIARY_CLI_INSTALL_URL, SUPPORTED_MINORS};
use crate::dependencies::overrides::PathOverrideKind;
use crate::dependencies::search::ToolSpec;
use crate::dependencies::version::VersionPolicy;

pub(super) const PYTHON_INSTALL_URL: &str = "https://www.python.org/downloads/macos/";

pub(super) const UV_INSTALL_URL: &str =
    "https://docs.astral.sh/uv/getting-started/installation/#macos-and-linux";

pub(super) const RECOMMENDATIONS: &str = "macOS Installation Recommendations:

1. Python: Install with Homebrew or from python.org
   - Homebrew: brew install python@3.13
   - Direct download: https://python.org/downloads/macos/

2. uv Package Manager: Install with Homebrew or the install script
   - Homebrew: brew install uv
   - Script: curl -LsSf https://astral.sh/uv/install.sh | sh

3. Tool server: Installed automatically by the bridge";

/// Detection rules for macOS.
#[derive(Debug, Clone)]
pub struct MacOsDetector {
    folders: KnownFolders,
}

impl MacOsDetector {
    pub fn new(folders: KnownFolders) -> Self {
        Self { folders }
    }

    /// Versioned interpreters under the user's pyenv, then Homebrew
    /// (Apple Silicon and Intel prefixes), then the python.org framework.
    pub fn interpreter_candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Some(home) = &self.folders.home {
            for minor in SUPPORTED_MINORS {
                candidates.push(home.join(".local").join("bin").join(format!("python3.{}", minor)));
            }
        }

        for minor in SUPPORTED_MINORS {
            candidates.push(PathBuf::from(format!("/opt/homebrew/bin/python3.{}", minor)));
            candidates.push(PathBuf::from(format!("/usr/local/bin/python3.{}", minor)));
            candidates.push(PathBuf::from(format!(
                "/Library/Frameworks/Python.framework/Versions/3.{}/bin/python3",
                minor
            )));
        }

        candidates.push(PathBuf::from("/opt/homebrew/bin/python3"));
        candidates.push(PathBuf::from("/usr/local/bin/python3"));
        candidates.push(PathBuf::from("/usr/bin/python3"));
        candidates
    }

    pub fn uv_candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(home) = &self.folders.home {
            candidates.push(home.join(".local").join("bin").join("uv"));
            candidates.push(home.join(".cargo").join("bin").join("uv"));
        }
        candidates.push(PathBuf::from("/opt/homebrew/bin/uv"));
        candidates.push(PathBuf::from("/usr/local/bin/uv"));
        candidates
    }

    pub fn auxiliary_cli_candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(home) = &self.folders.home {
            candidates.push(home.join(".claude").join("local").join("claude"));
            candidates.push(home.join(".local").join("bin").join("claude"));
            candidates.push(home.join(".npm-global").join("bin").join("claude"));
        }
        candidates.push(PathBuf::from("/opt/homebrew/bin/claude"));
        candidates.push(PathBuf::from("/usr/local/bin/claude"));
        candidates
    }

    pub fn interpreter_spec(&self) -> ToolSpec {
        ToolSpec {
            name: "Python",
            override_kind: PathOverrideKind::Interpreter,
            is_required: true,
            search_names: &["python3", "python"],
            candidates: self.interpreter_candidates(),
            version_prefix: Some("Python "),
            policy: VersionPolicy::MinimumInterpreter,
            install_hint: PYTHON_INSTALL_URL.to_string(),
            missing_message:
                "Python not found. Please install Python 3.10 or later with Homebrew or from python.org."
                    .to_string(),
            missing_details: Some(
                "Checked PATH, Homebrew and Python.framework installation paths.".to_string(),
            ),
        }
    }

    pub fn package_manager_spec(&self) -> ToolSpec {
        ToolSpec {
            name: "uv",
            override_kind: PathOverrideKind::PackageManager,
            is_required: true,
            search_names: &["uv"],
            candidates: self.uv_candidates(),
            version_prefix: Some("uv "),
            policy: VersionPolicy::AnyParsable,
            install_hint: UV_INSTALL_URL.to_string(),
            missing_message:
                "uv package manager not found. Please install uv with Homebrew or the install script."
                    .to_string(),
            missing_details: Some("Checked PATH, ~/.local/bin and Homebrew.".to_string()),
        }
    }

    pub fn auxiliary_cli_spec(&self) -> ToolSpec {
        ToolSpec {
            name: "Claude CLI",
            override_kind: PathOverrideKind::AuxiliaryCli,
            is_required: false,
            search_names: &["claude"],
            candidates: self.auxiliary_cli_candidates(),
            version_prefix: None,
            policy: VersionPolicy::AnyParsable,
            install_hint: AUXILIARY_CLI_INSTALL_URL.to_string(),
            missing_message: "Claude CLI not found.".to_string(),
            missing_details: Some(
                "Install it with npm: npm install -g @anthropic-ai/claude-code".to_string(),
            ),
        }
    }
}
