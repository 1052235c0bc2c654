//! User interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for pipes and CI
//! - [`MockUI`] for asserting on output in tests
//!
//! # Example
//!
//! ```
//! use toolbridge::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("Dependencies");
//! ui.success("Python 3.12.4 found");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, Tone, ToolbridgeTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Errors are shown in every mode.
    fn error(&mut self, msg: &str);

    /// Show a section header.
    fn show_header(&mut self, title: &str);

    /// Show an indented `key: value` line.
    fn show_detail(&mut self, key: &str, value: &str);

    /// Show a status line colored by `tone`.
    fn show_status(&mut self, tone: Tone, label: &str, detail: Option<&str>);

    /// Show a hint or recommendation block.
    fn show_hint(&mut self, hint: &str);

    /// Write machine-readable output verbatim, regardless of mode.
    fn raw(&mut self, text: &str);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}
