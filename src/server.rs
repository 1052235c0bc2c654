//! Tool-server install state and the status banner derived from it.
//!
//! toolbridge does not install the tool-server; it only reads what the
//! installer left behind and tells the user whether something needs
//! attention.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::dependencies::{KnownFolders, PathOverrideKind, PathOverrideStore};

/// File holding the installed server version.
pub const VERSION_FILE: &str = "server_version.txt";

/// File holding the last installation error, if any.
pub const INSTALL_ERROR_FILE: &str = "install_error.txt";

/// What is known about the installed tool-server.
pub trait ServerInstallQuery {
    /// Whether the server ships embedded in the package.
    fn has_embedded_server(&self) -> bool;

    /// Installed server version, if any.
    fn installed_version(&self) -> Option<String>;

    /// Version bundled with the current package.
    fn package_version(&self) -> String;

    /// Error from the last installation attempt.
    fn last_install_error(&self) -> Option<String>;
}

/// Banner shown above the server status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServerBanner {
    InstallFailed { error: String },
    NotInstalled,
    UpdateAvailable { installed: String, package: String },
}

impl ServerBanner {
    /// Decide which banner, if any, to show.
    pub fn evaluate(query: &dyn ServerInstallQuery) -> Option<Self> {
        if let Some(error) = query.last_install_error() {
            return Some(Self::InstallFailed { error });
        }

        let embedded = query.has_embedded_server();
        let installed = query.installed_version();

        match installed {
            None if !embedded => Some(Self::NotInstalled),
            Some(installed) if !embedded && installed != query.package_version() => {
                Some(Self::UpdateAvailable {
                    installed,
                    package: query.package_version(),
                })
            }
            _ => None,
        }
    }

    /// Text shown to the user.
    pub fn message(&self) -> String {
        match self {
            Self::InstallFailed { error } => format!(
                "Server installation failed: {}. Check the logs and try reinstalling.",
                error
            ),
            Self::NotInstalled => {
                "Server not installed. It will be installed the next time the bridge starts."
                    .to_string()
            }
            Self::UpdateAvailable { installed, package } => {
                format!("Server update available (v{} → v{})", installed, package)
            }
        }
    }

    /// Whether the banner reports a failure rather than a notice.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::InstallFailed { .. })
    }
}

/// Where the installer puts the server sources when no override is set.
pub fn default_server_dir(folders: &KnownFolders) -> Option<PathBuf> {
    folders
        .local_app_data
        .as_ref()
        .map(|d| d.join("UnityMCP").join("UnityMcpServer").join("src"))
}

/// The server directory override if set, else the default install location.
pub fn resolve_server_dir(
    overrides: &PathOverrideStore,
    folders: &KnownFolders,
) -> Option<PathBuf> {
    overrides
        .get(PathOverrideKind::ServerDirectory)
        .map(Path::to_path_buf)
        .or_else(|| default_server_dir(folders))
}

/// Reads install state from a server directory.
///
/// The directory is considered embedded when it contains a `server.py`
/// alongside `pyproject.toml`; otherwise its `server_version.txt` gives the
/// installed version.
#[derive(Debug, Clone)]
pub struct DirectoryServerInstall {
    dir: PathBuf,
    package_version: String,
}

impl DirectoryServerInstall {
    pub fn new(dir: impl Into<PathBuf>, package_version: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            package_version: package_version.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_trimmed(&self, name: &str) -> Option<String> {
        let text = fs::read_to_string(self.dir.join(name)).ok()?;
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

impl ServerInstallQuery for DirectoryServerInstall {
    fn has_embedded_server(&self) -> bool {
        self.dir.join("server.py").is_file() && self.dir.join("pyproject.toml").is_file()
    }

    fn installed_version(&self) -> Option<String> {
        self.read_trimmed(VERSION_FILE)
    }

    fn package_version(&self) -> String {
        self.package_version.clone()
    }

    fn last_install_error(&self) -> Option<String> {
        self.read_trimmed(INSTALL_ERROR_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixed {
        embedded: bool,
        installed: Option<&'static str>,
        error: Option<&'static str>,
    }

    impl ServerInstallQuery for Fixed {
        fn has_embedded_server(&self) -> bool {
            self.embedded
        }

        fn installed_version(&self) -> Option<String> {
            self.installed.map(str::to_string)
        }

        fn package_version(&self) -> String {
            "4.1.0".to_string()
        }

        fn last_install_error(&self) -> Option<String> {
            self.error.map(str::to_string)
        }
    }

    #[test]
    fn install_error_wins() {
        let banner = ServerBanner::evaluate(&Fixed {
            embedded: true,
            installed: Some("4.1.0"),
            error: Some("disk full"),
        })
        .unwrap();
        assert!(banner.is_error());
        assert!(banner.message().starts_with("Server installation failed: disk full"));
    }

    #[test]
    fn not_installed() {
        let banner = ServerBanner::evaluate(&Fixed {
            embedded: false,
            installed: None,
            error: None,
        });
        assert_eq!(banner, Some(ServerBanner::NotInstalled));
    }

    #[test]
    fn update_available() {
        let banner = ServerBanner::evaluate(&Fixed {
            embedded: false,
            installed: Some("4.0.2"),
            error: None,
        })
        .unwrap();
        assert_eq!(banner.message(), "Server update available (v4.0.2 → v4.1.0)");
    }

    #[test]
    fn up_to_date_or_embedded_has_no_banner() {
        assert_eq!(
            ServerBanner::evaluate(&Fixed {
                embedded: false,
                installed: Some("4.1.0"),
                error: None,
            }),
            None
        );
        assert_eq!(
            ServerBanner::evaluate(&Fixed {
                embedded: true,
                installed: Some("3.0.0"),
                error: None,
            }),
            None
        );
    }

    #[test]
    fn directory_install_reads_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(VERSION_FILE), "4.0.0\n").unwrap();

        let install = DirectoryServerInstall::new(temp.path(), "4.1.0");
        assert!(!install.has_embedded_server());
        assert_eq!(install.installed_version(), Some("4.0.0".to_string()));
        assert_eq!(install.last_install_error(), None);

        fs::write(temp.path().join(INSTALL_ERROR_FILE), "uv sync failed\n").unwrap();
        assert_eq!(install.last_install_error(), Some("uv sync failed".to_string()));
    }

    #[test]
    fn server_dir_prefers_override() {
        use crate::config::MemorySettings;
        use std::sync::Arc;

        let temp = TempDir::new().unwrap();
        let folders = KnownFolders {
            local_app_data: Some(PathBuf::from("/data")),
            ..KnownFolders::default()
        };
        let mut overrides = PathOverrideStore::load(Arc::new(MemorySettings::new())).unwrap();
        assert_eq!(
            resolve_server_dir(&overrides, &folders),
            Some(PathBuf::from("/data/UnityMCP/UnityMcpServer/src"))
        );

        overrides
            .set(PathOverrideKind::ServerDirectory, temp.path())
            .unwrap();
        assert_eq!(
            resolve_server_dir(&overrides, &folders),
            Some(temp.path().to_path_buf())
        );
        assert_eq!(resolve_server_dir(
            &PathOverrideStore::load(Arc::new(MemorySettings::new())).unwrap(),
            &KnownFolders::default()
        ), None);
    }

    #[test]
    fn directory_with_sources_is_embedded() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("server.py"), "").unwrap();
        fs::write(temp.path().join("pyproject.toml"), "").unwrap();

        let install = DirectoryServerInstall::new(temp.path(), "4.1.0");
        assert!(install.has_embedded_server());
        assert_eq!(ServerBanner::evaluate(&install), None);
    }
}
