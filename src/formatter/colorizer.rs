//! Color output support for terminal messages
//!
//! Wraps nu-ansi-term styles behind a switch so `--no-color` and the
//! `output.color_output` setting turn every style off in one place.

use nu_ansi_term::{Color, Style};

use crate::export::{Notice, NoticeLevel};

/// Color scheme for notices and CLI messages
#[derive(Debug, Clone, Copy)]
pub struct Colorizer {
    enabled: bool,
}

impl Colorizer {
    /// Create a new colorizer
    ///
    /// # Arguments
    /// * `enabled` - Enable color output
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Whether styles are applied
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Colorize text as success (green)
    pub fn success(&self, text: &str) -> String {
        self.paint(Color::Green.bold(), text)
    }

    /// Colorize text as error (red), prefixed with `Error: `
    pub fn error(&self, text: &str) -> String {
        self.paint(Color::Red.normal(), &format!("Error: {}", text))
    }

    /// Colorize text as warning (yellow)
    pub fn warning(&self, text: &str) -> String {
        self.paint(Color::Yellow.normal(), text)
    }

    /// Dimmed secondary text, e.g. output paths
    pub fn dim(&self, text: &str) -> String {
        self.paint(Style::new().dimmed(), text)
    }

    /// Render a notice: green for info, red for errors.
    ///
    /// The notice message itself is never altered.
    pub fn notice(&self, notice: &Notice) -> String {
        match notice.level {
            NoticeLevel::Info => self.paint(Color::Green.bold(), &notice.message),
            NoticeLevel::Error => self.paint(Color::Red.bold(), &notice.message),
        }
    }

    /// Enable or disable colors
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl Default for Colorizer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorizer_no_colors() {
        let colorizer = Colorizer::new(false);
        let result = colorizer.error("test error");
        assert_eq!(result, "Error: test error");
        assert!(!result.contains("\x1b"));
    }

    #[test]
    fn test_colorizer_with_colors() {
        let colorizer = Colorizer::new(true);
        let result = colorizer.success("test");
        assert!(result.contains("\x1b"));
        assert!(result.contains("test"));
    }

    #[test]
    fn test_set_enabled() {
        let mut colorizer = Colorizer::default();
        assert!(colorizer.is_enabled());
        colorizer.set_enabled(false);
        assert!(!colorizer.is_enabled());
        assert_eq!(colorizer.warning("careful"), "careful");
    }

    #[test]
    fn test_notice_plain() {
        let colorizer = Colorizer::new(false);
        let notice = Notice::error("Aucune donnée à exporter");
        assert_eq!(colorizer.notice(&notice), "Aucune donnée à exporter");
    }

    #[test]
    fn test_notice_colored_keeps_message() {
        let mut colorizer = Colorizer::new(false);
        colorizer.set_enabled(true);
        let rendered = colorizer.notice(&Notice::info("Export PDF réussi"));
        assert!(rendered.starts_with("\x1b["));
        assert!(rendered.contains("Export PDF réussi"));
    }
}
