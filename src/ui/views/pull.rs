use plugin_sdk::application::PullReport;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_pull_report(report: &PullReport, supports_color: bool, supports_unicode: bool) -> String {
    let label = report.kind.label();
    if report.already_in_sync() {
        format!(
            "{} {} skin(s) already in sync.\n",
            Icon::Pending.colored(supports_color, supports_unicode),
            capitalize(label)
        )
    } else {
        let text = format!(
            "{} skin(s) synced from remote to local ({} files).",
            capitalize(label),
            report.transferred
        );
        format!(
            "{} {}\n",
            Icon::Success.colored(supports_color, supports_unicode),
            ColoredText::success(text).render(supports_color)
        )
    }
}

pub fn render_build_complete(output: &str, supports_color: bool, supports_unicode: bool) -> String {
    format!(
        "{} {}\n",
        Icon::Build.colored(supports_color, supports_unicode),
        ColoredText::success(format!("Compiled {}", output)).render(supports_color)
    )
}

pub fn render_clean(path: &str, removed: bool, supports_color: bool, supports_unicode: bool) -> String {
    if removed {
        format!(
            "{} Removed {}\n",
            Icon::Trash.colored(supports_color, supports_unicode),
            path
        )
    } else {
        format!(
            "{} Nothing to clean at {}\n",
            Icon::Pending.colored(supports_color, supports_unicode),
            path
        )
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
