//! Override command implementation.
//!
//! The `toolbridge override` command lists, sets and clears the per-user
//! path overrides that replace automatic detection.

use std::path::Path;

use crate::cli::args::{OverrideAction, OverrideArgs};
use crate::dependencies::{
    DependencyStatus, DetectionContext, PathOverrideKind, PathOverrideStore,
};
use crate::error::{Result, ToolbridgeError};
use crate::ui::{Tone, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display;

/// The override command implementation.
pub struct OverrideCommand<'a> {
    ctx: &'a CommandContext,
    args: OverrideArgs,
}

impl<'a> OverrideCommand<'a> {
    pub fn new(ctx: &'a CommandContext, args: OverrideArgs) -> Self {
        Self { ctx, args }
    }

    fn show(&self, ui: &mut dyn UserInterface, overrides: &PathOverrideStore) {
        ui.show_header("Path overrides");
        for kind in PathOverrideKind::ALL {
            match overrides.get(kind) {
                Some(path) => ui.show_status(
                    Tone::Ok,
                    &kind.to_string(),
                    Some(&path.display().to_string()),
                ),
                None => ui.show_status(Tone::Neutral, &kind.to_string(), Some("auto-detected")),
            }
        }
    }

    fn set(
        &self,
        ui: &mut dyn UserInterface,
        overrides: &mut PathOverrideStore,
        kind: PathOverrideKind,
        path: &Path,
    ) -> Result<CommandResult> {
        match overrides.set(kind, path) {
            Ok(()) => {}
            Err(e @ ToolbridgeError::InvalidOverride { .. }) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(2));
            }
            Err(e) => return Err(e),
        }
        ui.success(&format!("{} override set to {}", kind, path.display()));

        // The path exists, but it may still not be a usable tool.
        if let Some(status) = self.detect(kind, overrides) {
            display::show_dependency(ui, &status);
            if !status.is_available {
                ui.warning(&format!(
                    "The override is saved, but {} will be reported as unavailable until it points at a working executable",
                    status.name
                ));
            }
        }
        Ok(CommandResult::success())
    }

    fn detect(
        &self,
        kind: PathOverrideKind,
        overrides: &PathOverrideStore,
    ) -> Option<DependencyStatus> {
        let detector = self.ctx.detector();
        let detection = DetectionContext::new(self.ctx.runner.as_ref(), overrides);
        match kind {
            PathOverrideKind::Interpreter => Some(detector.detect_interpreter(&detection)),
            PathOverrideKind::PackageManager => Some(detector.detect_package_manager(&detection)),
            PathOverrideKind::AuxiliaryCli => Some(detector.detect_auxiliary_cli(&detection)),
            PathOverrideKind::ServerDirectory => None,
        }
    }
}

impl Command for OverrideCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut overrides = self.ctx.overrides()?;

        match &self.args.action {
            OverrideAction::Show => {
                self.show(ui, &overrides);
                Ok(CommandResult::success())
            }
            OverrideAction::Set { kind, path } => self.set(ui, &mut overrides, *kind, path),
            OverrideAction::Clear { kind } => {
                let had = overrides.has(*kind);
                overrides.clear(*kind)?;
                if had {
                    ui.success(&format!("{} override cleared; using auto-detection", kind));
                } else {
                    ui.message(&format!("No {} override was set", kind));
                }
                Ok(CommandResult::success())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{keys, MemorySettings, SettingValue, SettingsBackend};
    use crate::dependencies::{KnownFolders, Platform, ScriptedRunner};
    use crate::ui::MockUI;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn context(backend: &MemorySettings, runner: ScriptedRunner) -> CommandContext {
        CommandContext::system(Arc::new(backend.clone()))
            .with_platform(Platform::Linux, KnownFolders::default())
            .with_runner(Box::new(runner))
    }

    fn run(ctx: &CommandContext, action: OverrideAction, ui: &mut MockUI) -> CommandResult {
        OverrideCommand::new(ctx, OverrideArgs { action })
            .execute(ui)
            .unwrap()
    }

    #[test]
    fn set_valid_override_persists_and_detects() {
        let temp = TempDir::new().unwrap();
        let uv = temp.path().join("uv");
        fs::write(&uv, "").unwrap();

        let backend = MemorySettings::new();
        let ctx = context(&backend, ScriptedRunner::new().with_output(&uv, "uv 0.4.30"));
        let mut ui = MockUI::new();

        let result = run(
            &ctx,
            OverrideAction::Set {
                kind: PathOverrideKind::PackageManager,
                path: uv.clone(),
            },
            &mut ui,
        );

        assert!(result.success);
        assert!(ui.has_success("package manager override set"));
        assert_eq!(ui.status_tone("uv 0.4.30"), Some(Tone::Ok));
        assert_eq!(
            backend.get_string(keys::OVERRIDE_PACKAGE_MANAGER).unwrap(),
            Some(uv.to_string_lossy().into_owned())
        );
    }

    #[test]
    fn set_missing_path_is_rejected_without_writing() {
        let backend = MemorySettings::new();
        let ctx = context(&backend, ScriptedRunner::new());
        let mut ui = MockUI::new();

        let result = run(
            &ctx,
            OverrideAction::Set {
                kind: PathOverrideKind::Interpreter,
                path: PathBuf::from("/nonexistent/python3"),
            },
            &mut ui,
        );

        assert_eq!(result.exit_code, 2);
        assert!(ui.has_error("file does not exist"));
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn set_non_working_executable_warns() {
        let temp = TempDir::new().unwrap();
        let python = temp.path().join("python3");
        fs::write(&python, "").unwrap();

        let backend = MemorySettings::new();
        let ctx = context(&backend, ScriptedRunner::new().with_output(&python, "Python 3.8.10"));
        let mut ui = MockUI::new();

        let result = run(
            &ctx,
            OverrideAction::Set {
                kind: PathOverrideKind::Interpreter,
                path: python,
            },
            &mut ui,
        );

        assert!(result.success);
        assert_eq!(ui.status_tone("Python"), Some(Tone::Error));
        assert!(ui.has_warning("reported as unavailable"));
    }

    #[test]
    fn show_and_clear() {
        let temp = TempDir::new().unwrap();
        let backend = MemorySettings::new().with_value(
            keys::OVERRIDE_SERVER_DIRECTORY,
            SettingValue::Text(temp.path().to_string_lossy().into_owned()),
        );
        let ctx = context(&backend, ScriptedRunner::new());

        let mut ui = MockUI::new();
        run(&ctx, OverrideAction::Show, &mut ui);
        assert_eq!(ui.status_tone("server directory"), Some(Tone::Ok));
        assert_eq!(ui.status_tone("interpreter"), Some(Tone::Neutral));

        let mut ui = MockUI::new();
        run(
            &ctx,
            OverrideAction::Clear {
                kind: PathOverrideKind::ServerDirectory,
            },
            &mut ui,
        );
        assert!(ui.has_success("server directory override cleared"));
        assert_eq!(backend.get_string(keys::OVERRIDE_SERVER_DIRECTORY).unwrap(), None);

        let mut ui = MockUI::new();
        run(
            &ctx,
            OverrideAction::Clear {
                kind: PathOverrideKind::ServerDirectory,
            },
            &mut ui,
        );
        assert!(ui.has_message("No server directory override was set"));
    }
}
