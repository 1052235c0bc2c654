use std::path::PathBuf;

use super::{KnownFolders, AUXILIARY_CLI_INSTALL_URL, SUPPORTED_MINORS};
use crate::dependencies::overrides::PathOverrideKind;
use crate::dependencies::search::ToolSpec;
use crate::dependencies::version::VersionPolicy;

pub(super) const PYTHON_INSTALL_URL: &str =
    "https://apps.microsoft.com/store/detail/python-313/9NCVDN91XZQP";

pub(super) const UV_INSTALL_URL: &str =
    "https://docs.astral.sh/uv/getting-started/installation/#windows";

pub(super) const RECOMMENDATIONS: &str = "Windows Installation Recommendations:

1. Python: Install from Microsoft Store or python.org
   - Microsoft Store: Search for 'Python 3.10' or higher
   - Direct download: https://python.org/downloads/windows/

2. uv Package Manager: Install via PowerShell
   - Run: powershell -ExecutionPolicy ByPass -c \"irm https://astral.sh/uv/install.ps1 | iex\"
   - Or download from: https://github.com/astral-sh/uv/releases

3. Tool server: Installed automatically by the bridge";

/// Detection rules for Windows.
#[derive(Debug, Clone)]
pub struct WindowsDetector {
    folders: KnownFolders,
}

impl WindowsDetector {
    pub fn new(folders: KnownFolders) -> Self {
        Self { folders }
    }

    /// Python install locations: per-user installs, Program Files, the
    /// legacy `C:\PythonXY` layout, then the user profile root.
    pub fn interpreter_candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Some(local) = &self.folders.local_app_data {
            for minor in SUPPORTED_MINORS {
                candidates.push(
                    local
                        .join("Programs")
                        .join("Python")
                        .join(format!("Python3{}", minor))
                        .join("python.exe"),
                );
            }
        }

        if let Some(program_files) = &self.folders.program_files {
            for minor in SUPPORTED_MINORS {
                candidates.push(
                    program_files
                        .join(format!("Python3{}", minor))
                        .join("python.exe"),
                );
            }
        }

        for minor in SUPPORTED_MINORS {
            candidates.push(PathBuf::from(format!("C:\\Python3{}\\python.exe", minor)));
        }

        if let Some(home) = &self.folders.home {
            for minor in SUPPORTED_MINORS {
                candidates.push(home.join(format!("Python3{}", minor)).join("python.exe"));
            }
        }

        candidates
    }

    pub fn uv_candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(home) = &self.folders.home {
            candidates.push(home.join(".local").join("bin").join("uv.exe"));
            candidates.push(home.join(".cargo").join("bin").join("uv.exe"));
        }
        if let Some(local) = &self.folders.local_app_data {
            candidates.push(local.join("Programs").join("uv").join("uv.exe"));
        }
        if let Some(app_data) = &self.folders.app_data {
            candidates.push(app_data.join("Python").join("Scripts").join("uv.exe"));
        }
        candidates
    }

    pub fn auxiliary_cli_candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(app_data) = &self.folders.app_data {
            candidates.push(app_data.join("npm").join("claude.cmd"));
        }
        if let Some(home) = &self.folders.home {
            candidates.push(home.join(".local").join("bin").join("claude.exe"));
        }
        candidates
    }

    pub fn interpreter_spec(&self) -> ToolSpec {
        ToolSpec {
            name: "Python",
            override_kind: PathOverrideKind::Interpreter,
            is_required: true,
            search_names: &["python.exe", "python3.exe"],
            candidates: self.interpreter_candidates(),
            version_prefix: Some("Python "),
            policy: VersionPolicy::MinimumInterpreter,
            install_hint: PYTHON_INSTALL_URL.to_string(),
            missing_message:
                "Python not found. Please install Python 3.10 or later from Microsoft Store or python.org."
                    .to_string(),
            missing_details: Some(
                "Checked PATH environment variable and common installation paths.".to_string(),
            ),
        }
    }

    pub fn package_manager_spec(&self) -> ToolSpec {
        ToolSpec {
            name: "uv",
            override_kind: PathOverrideKind::PackageManager,
            is_required: true,
            search_names: &["uv.exe"],
            candidates: self.uv_candidates(),
            version_prefix: Some("uv "),
            policy: VersionPolicy::AnyParsable,
            install_hint: UV_INSTALL_URL.to_string(),
            missing_message: "uv package manager not found. Please install uv via PowerShell."
                .to_string(),
            missing_details: Some(
                "Checked PATH environment variable and common installation paths.".to_string(),
            ),
        }
    }

    pub fn auxiliary_cli_spec(&self) -> ToolSpec {
        ToolSpec {
            name: "Claude CLI",
            override_kind: PathOverrideKind::AuxiliaryCli,
            is_required: false,
            search_names: &["claude.exe", "claude.cmd"],
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
    use crate::dependencies::{KnownFolders, Platform, PlatformDetector};
    use std::path::Path;
    use std::sync::Arc;

    fn folders() -> KnownFolders {
        KnownFolders {
            home: Some(PathBuf::from("C:\\Users\\dev")),
            local_app_data: Some(PathBuf::from("C:\\Users\\dev\\AppData\\Local")),
            app_data: Some(PathBuf::from("C:\\Users\\dev\\AppData\\Roaming")),
            program_files: Some(PathBuf::from("C:\\Program Files")),
        }
    }

    #[test]
    fn interpreter_candidates_are_newest_first_per_root() {
        let candidates = WindowsDetector::new(folders()).interpreter_candidates();
        assert_eq!(candidates.len(), 20);

        let first = candidates[0].to_string_lossy().into_owned();
        assert!(first.contains("Programs"));
        assert!(first.contains("Python314"));
        assert!(candidates[4].to_string_lossy().contains("Python310"));
        assert!(candidates[5].to_string_lossy().contains("Program Files"));
        assert_eq!(candidates[10], PathBuf::from("C:\\Python314\\python.exe"));
    }

    #[test]
    fn missing_folders_contribute_no_candidates() {
        let candidates = WindowsDetector::new(KnownFolders::default()).interpreter_candidates();
        assert_eq!(candidates.len(), 5);
        assert!(candidates.iter().all(|c| c.to_string_lossy().starts_with("C:\\Python")));
    }

    #[test]
    fn search_names_prefer_python_exe() {
        let spec = WindowsDetector::new(folders()).interpreter_spec();
        assert_eq!(spec.search_names, &["python.exe", "python3.exe"]);
    }

    #[test]
    fn missing_message_names_minimum_version() {
        let detector = PlatformDetector::for_platform(Platform::Windows, KnownFolders::default());
        let runner = ScriptedRunner::new();
        let overrides = PathOverrideStore::load(Arc::new(MemorySettings::new())).unwrap();
        let ctx = DetectionContext::new(&runner, &overrides);

        let status = detector.detect_interpreter(&ctx);
        assert_eq!(
            status.error_message.as_deref(),
            Some("Python not found. Please install Python 3.10 or later from Microsoft Store or python.org.")
        );
        assert_eq!(status.installation_hint, PYTHON_INSTALL_URL);
    }

    #[test]
    fn where_result_is_used_verbatim() {
        let detector = PlatformDetector::for_platform(Platform::Windows, folders());
        let alias = "C:\\Users\\dev\\AppData\\Local\\Microsoft\\WindowsApps\\python.exe";
        let runner = ScriptedRunner::new()
            .with_search_result("python.exe", alias)
            .with_output(alias, "Python 3.13.2\r\n");
        let overrides = PathOverrideStore::load(Arc::new(MemorySettings::new())).unwrap();
        let ctx = DetectionContext::new(&runner, &overrides);

        let status = detector.detect_interpreter(&ctx);
        assert_eq!(status.path(), Some(Path::new(alias)));
        assert!(!runner.was_searched("python3.exe"));
    }

    #[test]
    fn recommendations_mention_powershell_installer() {
        assert!(RECOMMENDATIONS.contains("irm https://astral.sh/uv/install.ps1 | iex"));
    }
}
