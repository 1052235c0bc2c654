//! toolbridge CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use toolbridge::cli::{Cli, CommandContext, CommandDispatcher};
use toolbridge::config::{FileSettings, Preferences, SharedSettings};
use toolbridge::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag or the persisted debug-logging preference sets DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("toolbridge=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("toolbridge=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn open_settings(cli: &Cli) -> anyhow::Result<SharedSettings> {
    let settings = match &cli.settings {
        Some(path) => FileSettings::new(path),
        None => FileSettings::open_default()
            .context("no per-user config directory; pass --settings")?,
    };
    Ok(Arc::new(settings))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match open_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("✗ Error: {:#}", e);
            return ExitCode::from(1);
        }
    };

    // An unreadable settings file must not stop the CLI from starting.
    let persisted_debug = Preferences::load(settings.clone())
        .map(|prefs| prefs.debug_logs())
        .unwrap_or(false);
    init_tracing(cli.debug || persisted_debug);

    tracing::debug!("toolbridge starting with args: {:?}", cli);

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else if cli.verbose {
        OutputMode::Verbose
    } else {
        OutputMode::Normal
    };

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let mut ui = create_ui(true, output_mode);
    let dispatcher = CommandDispatcher::new(CommandContext::system(settings));

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
