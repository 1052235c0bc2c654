//! Non-interactive UI for pipes, CI and headless environments.

use super::theme::ToolbridgeTheme;
use super::{OutputMode, Tone, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Output is unstyled. Warnings and errors go to stderr so that piped
/// stdout stays parseable.
pub struct NonInteractiveUI {
    mode: OutputMode,
    theme: ToolbridgeTheme,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            theme: ToolbridgeTheme::plain(),
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", self.theme.format_warning(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_decoration() {
            println!("\n{}\n", title);
        }
    }

    fn show_detail(&mut self, key: &str, value: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_detail(key, value));
        }
    }

    fn show_status(&mut self, tone: Tone, label: &str, detail: Option<&str>) {
        if self.mode.shows_status() || tone == Tone::Error {
            println!("{}", self.theme.format_status(tone, label, detail));
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_decoration() {
            for line in hint.lines() {
                println!("  {}", line);
            }
            println!();
        }
    }

    fn raw(&mut self, text: &str) {
        println!("{}", text);
    }

    fn is_interactive(&self) -> bool {
        false
    }
}
