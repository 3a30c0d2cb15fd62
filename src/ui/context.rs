use crate::cli::ColorWhen;
use crate::ui::terminal::{detect_capabilities, TerminalCapabilities};

/// Output settings shared by every command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiContext {
    pub json: bool,
    pub verbose: u8,
    pub color: bool,
    pub unicode: bool,
}

impl UiContext {
    pub fn new(json: bool, verbose: u8, cli_color: Option<ColorWhen>) -> Self {
        Self::from_caps(json, verbose, cli_color, detect_capabilities())
    }

    pub(crate) fn from_caps(
        json: bool,
        verbose: u8,
        cli_color: Option<ColorWhen>,
        caps: TerminalCapabilities,
    ) -> Self {
        let color = match cli_color {
            Some(ColorWhen::Never) => false,
            Some(ColorWhen::Always) => true,
            Some(ColorWhen::Auto) | None => caps.supports_color && !caps.is_ci,
        };

        Self {
            json,
            verbose,
            color: color && !json,
            unicode: caps.supports_unicode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(supports_color: bool, is_ci: bool) -> TerminalCapabilities {
        TerminalCapabilities {
            is_tty: true,
            supports_color,
            supports_unicode: true,
            is_ci,
        }
    }

    #[test]
    fn auto_color_follows_terminal() {
        assert!(UiContext::from_caps(false, 0, None, caps(true, false)).color);
        assert!(!UiContext::from_caps(false, 0, None, caps(true, true)).color);
    }

    #[test]
    fn explicit_color_wins_except_in_json() {
        assert!(UiContext::from_caps(false, 0, Some(ColorWhen::Always), caps(false, false)).color);
        assert!(!UiContext::from_caps(false, 0, Some(ColorWhen::Never), caps(true, false)).color);
        assert!(!UiContext::from_caps(true, 0, Some(ColorWhen::Always), caps(true, false)).color);
    }
}
