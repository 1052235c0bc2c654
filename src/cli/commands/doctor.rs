//! Doctor command implementation.
//!
//! The `toolbridge doctor` command detects the interpreter, the package
//! manager and the auxiliary CLI, and explains how to install whatever
//! required tool is missing.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::args::DoctorArgs;
use crate::dependencies::{DependencyStatus, DetectionContext};
use crate::error::{Result, ToolbridgeError};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display;

/// JSON shape of `doctor --json`.
#[derive(Debug, Serialize)]
struct DoctorReport<'a> {
    platform: &'static str,
    checked_at: DateTime<Utc>,
    ready: bool,
    dependencies: &'a [DependencyStatus],
}

/// The doctor command implementation.
pub struct DoctorCommand<'a> {
    ctx: &'a CommandContext,
    args: DoctorArgs,
}

impl<'a> DoctorCommand<'a> {
    pub fn new(ctx: &'a CommandContext, args: DoctorArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for DoctorCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let overrides = self.ctx.overrides()?;
        let detector = self.ctx.detector();
        let detection = DetectionContext::new(self.ctx.runner.as_ref(), &overrides);

        tracing::debug!("Running dependency checks for {}", detector.name());
        let statuses = detector.detect_all(&detection);
        let ready = !statuses.iter().any(DependencyStatus::is_blocking);

        if self.args.json {
            let report = DoctorReport {
                platform: detector.name(),
                checked_at: Utc::now(),
                ready,
                dependencies: &statuses,
            };
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| ToolbridgeError::Other(e.into()))?;
            ui.raw(&json);
        } else {
            ui.show_header(&format!("Dependencies ({})", detector.name()));
            for status in &statuses {
                display::show_dependency(ui, status);
            }
            ui.message("");

            if ready {
                ui.success("All required dependencies are available");
            } else {
                ui.show_hint(detector.installation_recommendations());
                ui.error("Required dependencies are missing");
            }
        }

        Ok(if ready {
            CommandResult::success()
        } else {
            CommandResult::failure(1)
        })
    }
}
