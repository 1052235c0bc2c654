use std::path::PathBuf;

use super::{KnownFolders, AUXILIARY_CLI_INSTALL_URL, SUPPORTED_MINORS};
use crate::dependencies::overrides::PathOverrideKind;
use crate::dependencies::search::ToolSpec;
use crate::dependencies::version::VersionPolicy;

pub(super) const PYTHON_INSTALL_URL: &str = "https://www.python.org/downloads/source/";

pub(super) const UV_INSTALL_URL: &str =
    "https://docs.astral.sh/uv/getting-started/installation/#macos-and-linux";

pub(super) const RECOMMENDATIONS: &str = "Linux Installation Recommendations:

1. Python: Install with your distribution's package manager
   - Debian/Ubuntu: sudo apt install python3.12
   - Fedora: sudo dnf install python3.12
   - Or build from source: https://python.org/downloads/source/

2. uv Package Manager: Install with the install script
   - Script: curl -LsSf https://astral.sh/uv/install.sh | sh
   - Or with pipx: pipx install uv

3. Tool server: Installed automatically by the bridge";

/// Detection rules for Linux and other Unix hosts.
#[derive(Debug, Clone)]
pub struct LinuxDetector {
    folders: KnownFolders,
}

impl LinuxDetector {
    pub fn new(folders: KnownFolders) -> Self {
        Self { folders }
    }

    pub fn interpreter_candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Some(home) = &self.folders.home {
            for minor in SUPPORTED_MINORS {
                candidates.push(home.join(".local").join("bin").join(format!("python3.{}", minor)));
            }
        }

        for minor in SUPPORTED_MINORS {
            candidates.push(PathBuf::from(format!("/usr/local/bin/python3.{}", minor)));
            candidates.push(PathBuf::from(format!("/usr/bin/python3.{}", minor)));
        }

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
        candidates.push(PathBuf::from("/usr/local/bin/uv"));
        candidates.push(PathBuf::from("/usr/bin/uv"));
        candidates
    }

    pub fn auxiliary_cli_candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(home) = &self.folders.home {
            candidates.push(home.join(".claude").join("local").join("claude"));
            candidates.push(home.join(".local").join("bin").join("claude"));
            candidates.push(home.join(".npm-global").join("bin").join("claude"));
        }
        candidates.push(PathBuf::from("/usr/local/bin/claude"));
        candidates.push(PathBuf::from("/usr/bin/claude"));
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
                "Python not found. Please install Python 3.10 or later with your package manager."
                    .to_string(),
            missing_details: Some(
                "Checked PATH, ~/.local/bin, /usr/local/bin and /usr/bin.".to_string(),
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
                "uv package manager not found. Please install uv with the install script."
                    .to_string(),
            missing_details: Some("Checked PATH, ~/.local/bin and ~/.cargo/bin.".to_string()),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemorySettings;
    use crate::dependencies::overrides::PathOverrideStore;
    use crate::dependencies::probe::ScriptedRunner;
    use crate::dependencies::search::DetectionContext;
    use std::path::Path;
    use std::sync::Arc;

    #[test]
    fn versioned_candidates_newest_first() {
        let candidates = LinuxDetector::new(KnownFolders::default()).interpreter_candidates();
        assert_eq!(candidates[0], PathBuf::from("/usr/local/bin/python3.14"));
        assert_eq!(candidates[1], PathBuf::from("/usr/bin/python3.14"));
        assert_eq!(candidates[8], PathBuf::from("/usr/local/bin/python3.10"));
    }

    #[test]
    fn falls_back_to_candidate_when_path_lookup_fails() {
        let detector = LinuxDetector::new(KnownFolders::with_home("/home/dev"));
        let runner = ScriptedRunner::new()
            .with_output("/usr/bin/python3.11", "Python 3.11.9");
        let overrides = PathOverrideStore::load(Arc::new(MemorySettings::new())).unwrap();
        let ctx = DetectionContext::new(&runner, &overrides);

        let status = crate::dependencies::search::detect_tool(&detector.interpreter_spec(), &ctx);
        assert_eq!(status.path(), Some(Path::new("/usr/bin/python3.11")));
        assert!(runner.was_searched("python3"));
        assert!(runner.was_searched("python"));
        assert!(!runner.was_run(Path::new("/usr/bin/python3.10")));
    }

    #[test]
    fn uv_candidates_include_user_installs() {
        let candidates = LinuxDetector::new(KnownFolders::with_home("/home/dev")).uv_candidates();
        assert_eq!(candidates[0], PathBuf::from("/home/dev/.local/bin/uv"));
        assert_eq!(candidates[1], PathBuf::from("/home/dev/.cargo/bin/uv"));
    }
}
