//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use toolbridge::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Checking dependencies");
//! ui.success("Done!");
//!
//! assert!(ui.has_message("Checking"));
//! assert!(ui.successes().contains(&"Done!".to_string()));
//! ```

use super::{OutputMode, Tone, UserInterface};

/// A captured status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub tone: Tone,
    pub label: String,
    pub detail: Option<String>,
}

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    details: Vec<(String, String)>,
    statuses: Vec<StatusLine>,
    hints: Vec<String>,
    raw: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            ..Default::default()
        }
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Captured `(key, value)` detail lines.
    pub fn details(&self) -> &[(String, String)] {
        &self.details
    }

    pub fn statuses(&self) -> &[StatusLine] {
        &self.statuses
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Everything written through [`UserInterface::raw`], joined by newlines.
    pub fn raw_output(&self) -> String {
        self.raw.join("\n")
    }

    /// Check if a message containing `msg` was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    pub fn has_hint(&self, msg: &str) -> bool {
        self.hints.iter().any(|m| m.contains(msg))
    }

    /// Value of the first detail line with `key`.
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Tone of the first status line whose label contains `label`.
    pub fn status_tone(&self, label: &str) -> Option<Tone> {
        self.statuses
            .iter()
            .find(|s| s.label.contains(label))
            .map(|s| s.tone)
    }

    /// Clear all captured interactions.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.successes.clear();
        self.warnings.clear();
        self.errors.clear();
        self.headers.clear();
        self.details.clear();
        self.statuses.clear();
        self.hints.clear();
        self.raw.clear();
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_detail(&mut self, key: &str, value: &str) {
        self.details.push((key.to_string(), value.to_string()));
    }

    fn show_status(&mut self, tone: Tone, label: &str, detail: Option<&str>) {
        self.statuses.push(StatusLine {
            tone,
            label: label.to_string(),
            detail: detail.map(str::to_string),
        });
    }

    fn show_hint(&mut self, hint: &str) {
        self.hints.push(hint.to_string());
    }

    fn raw(&mut self, text: &str) {
        self.raw.push(text.to_string());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_messages_by_kind() {
        let mut ui = MockUI::new();
        ui.message("hello");
        ui.success("done");
        ui.warning("careful");
        ui.error("broken");

        assert!(ui.has_message("hell"));
        assert!(ui.has_success("done"));
        assert!(ui.has_warning("care"));
        assert!(ui.has_error("broken"));
        assert!(!ui.has_error("hello"));
    }

    #[test]
    fn captures_details_and_statuses() {
        let mut ui = MockUI::new();
        ui.show_detail("Port", "6400");
        ui.show_status(Tone::Warning, "Ping Failed", Some("timed out"));

        assert_eq!(ui.detail("Port"), Some("6400"));
        assert_eq!(ui.detail("Pid"), None);
        assert_eq!(ui.status_tone("Ping"), Some(Tone::Warning));
        assert_eq!(ui.statuses()[0].detail.as_deref(), Some("timed out"));
    }

    #[test]
    fn raw_output_is_joined() {
        let mut ui = MockUI::new();
        ui.raw("{");
        ui.raw("}");
        assert_eq!(ui.raw_output(), "{\n}");
    }

    #[test]
    fn clear_resets_everything() {
        let mut ui = MockUI::new();
        ui.message("a");
        ui.show_hint("b");
        ui.clear();
        assert!(ui.messages().is_empty());
        assert!(ui.hints().is_empty());
    }

    #[test]
    fn mode_and_interactivity() {
        let mut ui = MockUI::with_mode(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
        assert!(!ui.is_interactive());
        ui.set_interactive(true);
        assert!(ui.is_interactive());
    }
}
