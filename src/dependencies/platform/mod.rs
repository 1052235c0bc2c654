//! Per-platform toolchain detection.
//!
//! Exactly one [`PlatformDetector`] variant is active for a host. Each
//! variant owns its search-path names, candidate install locations, install
//! URLs and recommendations; all of them share the detection algorithm in
//! [`search`](super::search).

mod linux;
mod macos;
mod windows;

use std::path::PathBuf;

use super::search::{detect_tool, DetectionContext, ToolSpec};
use super::status::DependencyStatus;

pub use linux::LinuxDetector;
pub use macos::MacOsDetector;
pub use windows::WindowsDetector;

/// Host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Detect the current platform.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
        }
    }
}

/// Well-known per-user and system folders used to build candidate paths.
///
/// A folder that cannot be determined is `None` and contributes no
/// candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownFolders {
    /// User profile / home directory.
    pub home: Option<PathBuf>,
    /// Per-user local application data (`%LOCALAPPDATA%`).
    pub local_app_data: Option<PathBuf>,
    /// Per-user roaming application data (`%APPDATA%`).
    pub app_data: Option<PathBuf>,
    /// System-wide program files (`%ProgramFiles%`).
    pub program_files: Option<PathBuf>,
}

impl KnownFolders {
    /// Resolve the folders for the current user.
    pub fn detect() -> Self {
        Self {
            home: dirs::home_dir(),
            local_app_data: dirs::data_local_dir(),
            app_data: dirs::data_dir(),
            program_files: std::env::var_os("ProgramFiles").map(PathBuf::from),
        }
    }

    /// Folders rooted at a single home directory, for tests.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: Some(home.into()),
            ..Self::default()
        }
    }
}

/// Interpreter versions probed in fixed candidate lists, newest first.
pub(crate) const SUPPORTED_MINORS: [u32; 5] = [14, 13, 12, 11, 10];

/// The detector for one platform.
#[derive(Debug, Clone)]
pub enum PlatformDetector {
    Windows(WindowsDetector),
    MacOs(MacOsDetector),
    Linux(LinuxDetector),
}

impl PlatformDetector {
    /// The detector for this host.
    pub fn current() -> Self {
        Self::for_platform(Platform::current(), KnownFolders::detect())
    }

    /// A detector for any platform with explicit folders.
    pub fn for_platform(platform: Platform, folders: KnownFolders) -> Self {
        match platform {
            Platform::Windows => Self::Windows(WindowsDetector::new(folders)),
            Platform::MacOs => Self::MacOs(MacOsDetector::new(folders)),
            Platform::Linux => Self::Linux(LinuxDetector::new(folders)),
        }
    }

    /// Which platform this detector serves.
    pub fn platform(&self) -> Platform {
        match self {
            Self::Windows(_) => Platform::Windows,
            Self::MacOs(_) => Platform::MacOs,
            Self::Linux(_) => Platform::Linux,
        }
    }

    /// Display name of the platform.
    pub fn name(&self) -> &'static str {
        self.platform().name()
    }

    /// How to find the Python interpreter.
    pub fn interpreter_spec(&self) -> ToolSpec {
        match self {
            Self::Windows(d) => d.interpreter_spec(),
            Self::MacOs(d) => d.interpreter_spec(),
            Self::Linux(d) => d.interpreter_spec(),
        }
    }

    /// How to find `uv`.
    pub fn package_manager_spec(&self) -> ToolSpec {
        match self {
            Self::Windows(d) => d.package_manager_spec(),
            Self::MacOs(d) => d.package_manager_spec(),
            Self::Linux(d) => d.package_manager_spec(),
        }
    }

    /// How to find the auxiliary client CLI.
    pub fn auxiliary_cli_spec(&self) -> ToolSpec {
        match self {
            Self::Windows(d) => d.auxiliary_cli_spec(),
            Self::MacOs(d) => d.auxiliary_cli_spec(),
            Self::Linux(d) => d.auxiliary_cli_spec(),
        }
    }

    /// Detect the Python interpreter.
    pub fn detect_interpreter(&self, ctx: &DetectionContext<'_>) -> DependencyStatus {
        detect_tool(&self.interpreter_spec(), ctx)
    }

    /// Detect the `uv` package manager.
    pub fn detect_package_manager(&self, ctx: &DetectionContext<'_>) -> DependencyStatus {
        detect_tool(&self.package_manager_spec(), ctx)
    }

    /// Detect the auxiliary client CLI.
    pub fn detect_auxiliary_cli(&self, ctx: &DetectionContext<'_>) -> DependencyStatus {
        detect_tool(&self.auxiliary_cli_spec(), ctx)
    }

    /// Detect every tool, sequentially.
    pub fn detect_all(&self, ctx: &DetectionContext<'_>) -> Vec<DependencyStatus> {
        vec![
            self.detect_interpreter(ctx),
            self.detect_package_manager(ctx),
            self.detect_auxiliary_cli(ctx),
        ]
    }

    /// Where to download Python.
    pub fn install_url_for_interpreter(&self) -> &'static str {
        match self {
            Self::Windows(_) => windows::PYTHON_INSTALL_URL,
            Self::MacOs(_) => macos::PYTHON_INSTALL_URL,
            Self::Linux(_) => linux::PYTHON_INSTALL_URL,
        }
    }

    /// Where to get `uv`.
    pub fn install_url_for_package_manager(&self) -> &'static str {
        match self {
            Self::Windows(_) => windows::UV_INSTALL_URL,
            Self::MacOs(_) => macos::UV_INSTALL_URL,
            Self::Linux(_) => linux::UV_INSTALL_URL,
        }
    }

    /// Human-readable installation steps for this platform.
    pub fn installation_recommendations(&self) -> &'static str {
        match self {
            Self::Windows(_) => windows::RECOMMENDATIONS,
            Self::MacOs(_) => macos::RECOMMENDATIONS,
            Self::Linux(_) => linux::RECOMMENDATIONS,
        }
    }
}

/// Install hint shared by every platform for the auxiliary CLI.
pub(crate) const AUXILIARY_CLI_INSTALL_URL: &str = "https://docs.anthropic.com/en/docs/claude-code/setup";
