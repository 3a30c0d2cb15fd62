use crossterm::style::Stylize;

use plugin_sdk::application::Severity;

use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticColor {
    Success,
    Error,
    Warning,
    Info,
    Dim,
}

impl SemanticColor {
    fn color(self) -> crossterm::style::Color {
        match self {
            SemanticColor::Success => theme::colors::SUCCESS,
            SemanticColor::Error => theme::colors::ERROR,
            SemanticColor::Warning => theme::colors::WARNING,
            SemanticColor::Info => theme::colors::INFO,
            SemanticColor::Dim => theme::colors::DIM,
        }
    }
}

impl From<Severity> for SemanticColor {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Debug => SemanticColor::Dim,
            Severity::Info => SemanticColor::Info,
            Severity::Success => SemanticColor::Success,
            Severity::Warning => SemanticColor::Warning,
            Severity::Error => SemanticColor::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColoredText {
    text: String,
    color: SemanticColor,
    bold: bool,
}

impl ColoredText {
    pub fn new(color: SemanticColor, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color,
            bold: false,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(SemanticColor::Success, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(SemanticColor::Info, text)
    }

    pub fn dim(text: impl Into<String>) -> Self {
        Self::new(SemanticColor::Dim, text)
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn render(&self, supports_color: bool) -> String {
        if !supports_color {
            return self.text.clone();
        }
        let mut styled = self.text.as_str().with(self.color.color());
        if self.bold {
            styled = styled.bold();
        }
        format!("{}", styled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_without_color_returns_plain_text() {
        let t = ColoredText::success("ok");
        assert_eq!(t.render(false), "ok");
    }

    #[test]
    fn render_with_color_includes_ansi_escape() {
        let t = ColoredText::new(SemanticColor::Error, "no");
        assert!(t.render(true).contains("\u{1b}["));
    }

    #[test]
    fn notable_success_is_green() {
        assert_eq!(
            SemanticColor::from(Severity::Success),
            SemanticColor::Success
        );
        assert_eq!(SemanticColor::from(Severity::Debug), SemanticColor::Dim);
    }
}
