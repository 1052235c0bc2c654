//! Bridge command implementation.
//!
//! `toolbridge bridge status` attaches to whatever listens on the bridge
//! port and verifies it. `toolbridge bridge run` starts a bridge process
//! (or attaches to a running one) and supervises it in the foreground,
//! polling on a fixed tick until it goes away.

use serde::Serialize;
use std::thread;
use std::time::Duration;

use crate::bridge::{
    BridgeManager, BridgeOptions, BridgeSupervisor, BridgeVerificationResult, BridgeVerifier,
    CommandLauncher, StartOutcome,
};
use crate::cli::args::{BridgeAction, BridgeArgs, BridgeRunArgs, BridgeStatusArgs};
use crate::error::{Result, ToolbridgeError};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display;

/// Attach to the bridge on `port` and verify it.
///
/// Returns `None` when nothing accepts connections on the port.
pub(crate) fn check_running_bridge(port: u16) -> Result<Option<BridgeVerificationResult>> {
    let mut supervisor =
        BridgeSupervisor::new(BridgeManager::attach_only(port), BridgeVerifier::default());

    match supervisor.start() {
        Ok(_) => {}
        Err(ToolbridgeError::BridgeLaunchFailed { .. }) => return Ok(None),
        Err(e) => return Err(e),
    }

    let report = supervisor.tick();
    Ok(Some(
        report
            .verification
            .unwrap_or_else(BridgeVerificationResult::disconnected),
    ))
}

/// JSON shape of `bridge status --json`.
#[derive(Debug, Serialize)]
struct BridgeReport<'a> {
    port: u16,
    running: bool,
    #[serde(flatten)]
    verification: &'a BridgeVerificationResult,
}

/// The bridge command implementation.
pub struct BridgeCommand {
    args: BridgeArgs,
}

impl BridgeCommand {
    pub fn new(args: BridgeArgs) -> Self {
        Self { args }
    }

    fn status(&self, ui: &mut dyn UserInterface, args: &BridgeStatusArgs) -> Result<CommandResult> {
        let checked = check_running_bridge(args.port)?;
        let running = checked.is_some();
        let result = checked.unwrap_or_else(BridgeVerificationResult::disconnected);

        if args.json {
            let report = BridgeReport {
                port: args.port,
                running,
                verification: &result,
            };
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| ToolbridgeError::Other(e.into()))?;
            ui.raw(&json);
        } else {
            ui.show_header("Bridge");
            ui.show_detail("Port", &args.port.to_string());
            display::show_bridge_health(ui, &result);
        }

        Ok(if result.success() {
            CommandResult::success()
        } else {
            CommandResult::failure(1)
        })
    }

    fn run(&self, ui: &mut dyn UserInterface, args: &BridgeRunArgs) -> Result<CommandResult> {
        let launcher = CommandLauncher::new(&args.program, args.args.clone());
        let options = BridgeOptions {
            port: args.port,
            attach_existing: !args.no_attach,
        };
        let mut supervisor = BridgeSupervisor::new(
            BridgeManager::new(Box::new(launcher), options),
            BridgeVerifier::default(),
        );

        match supervisor.start() {
            Ok(StartOutcome::Spawned { pid }) => {
                ui.success(&format!("Started bridge (pid {}) on port {}", pid, args.port));
            }
            Ok(StartOutcome::Attached | StartOutcome::AlreadyRunning) => {
                ui.success(&format!("Attached to running bridge on port {}", args.port));
            }
            Err(e @ ToolbridgeError::BridgeLaunchFailed { .. }) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        }

        let tick = Duration::from_millis(args.tick_ms.max(10));
        let mut last_health = None;
        loop {
            thread::sleep(tick);
            let report = supervisor.tick();

            if let Some(result) = &report.verification {
                display::show_bridge_health(ui, result);
                last_health = Some(result.health());
            }
            if !report.running {
                break;
            }
        }

        match last_health {
            Some(health) => {
                ui.warning(&format!(
                    "Bridge on port {} stopped (last seen {})",
                    args.port, health
                ));
                Ok(CommandResult::success())
            }
            None => {
                ui.error("Bridge exited before it could be verified");
                Ok(CommandResult::failure(1))
            }
        }
    }
}

impl Command for BridgeCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.args.action {
            BridgeAction::Status(args) => self.status(ui, args),
            BridgeAction::Run(args) => self.run(ui, args),
        }
    }
}
