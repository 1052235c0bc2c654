//! Settings command implementation.
//!
//! The `toolbridge settings` command shows and changes the persisted
//! preferences: debug logging and the script validation level.

use crate::cli::args::{SettingsAction, SettingsArgs};
use crate::config::{Preferences, ValidationLevel};
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The settings command implementation.
pub struct SettingsCommand<'a> {
    ctx: &'a CommandContext,
    args: SettingsArgs,
}

impl<'a> SettingsCommand<'a> {
    pub fn new(ctx: &'a CommandContext, args: SettingsArgs) -> Self {
        Self { ctx, args }
    }
}

fn show(ui: &mut dyn UserInterface, prefs: &Preferences) {
    ui.show_header("Settings");
    ui.show_detail(
        "Debug logging",
        if prefs.debug_logs() { "on" } else { "off" },
    );
    let level = prefs.validation_level();
    ui.show_detail(
        "Validation level",
        &format!("{} ({}): {}", level, level.index(), level.description()),
    );
}

impl Command for SettingsCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut prefs = Preferences::load(self.ctx.settings.clone())?;

        match self.args.action.as_ref().unwrap_or(&SettingsAction::Show) {
            SettingsAction::Show => show(ui, &prefs),
            SettingsAction::Debug { enabled } => {
                prefs.set_debug_logs(*enabled)?;
                ui.success(&format!(
                    "Debug logging {}",
                    if *enabled { "enabled" } else { "disabled" }
                ));
            }
            SettingsAction::ValidationLevel { level } => {
                let clamped = ValidationLevel::from_index(*level);
                if clamped.index() != *level {
                    ui.warning(&format!(
                        "Validation level {} is out of range; using {}",
                        level,
                        clamped.index()
                    ));
                }
                prefs.set_validation_level(clamped)?;
                ui.success(&format!("Validation level set to {}", clamped));
                ui.message(clamped.description());
            }
        }

        Ok(CommandResult::success())
    }
}
