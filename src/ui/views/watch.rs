use plugin_sdk::application::{PipelineEvent, Severity};

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{ColoredText, SemanticColor};

pub struct WatchHeader<'a> {
    pub config: &'a str,
    pub plugin_dir: &'a str,
    pub host: Option<&'a str>,
    pub auto_commit: bool,
    pub sync_to_remote: bool,
    pub live_reload: bool,
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

pub fn render_watch_header(
    header: &WatchHeader<'_>,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut block = CommandHeader::new(Icon::Watch, "Plugin SDK Watch");
    block.add("Config", header.config);
    block.add("Plugin", header.plugin_dir);
    block.add("Host", header.host.unwrap_or("-"));
    block.add("Auto-commit", on_off(header.auto_commit));
    block.add("Sync", on_off(header.sync_to_remote));
    block.add("Live reload", on_off(header.live_reload));
    block.add("Hint", "Press Ctrl+C to stop");
    block.render(supports_color, supports_unicode)
}

fn icon_for(event: &PipelineEvent) -> Icon {
    match event {
        PipelineEvent::WatchStarted { .. } | PipelineEvent::Shutdown => Icon::Watch,
        PipelineEvent::FileChanged { .. } => Icon::Arrow,
        PipelineEvent::CommitQueued { .. } => Icon::Pending,
        PipelineEvent::CommitDequeued { .. } | PipelineEvent::LiveReloadTriggered { .. } => {
            Icon::Progress
        }
        PipelineEvent::Synced { .. } | PipelineEvent::CacheInvalidated { .. } => Icon::Remote,
        PipelineEvent::StylesheetCompiled { .. } => Icon::Build,
        _ => match event.severity() {
            Severity::Error => Icon::Error,
            Severity::Warning => Icon::Warning,
            Severity::Success => Icon::Success,
            Severity::Debug | Severity::Info => Icon::Pending,
        },
    }
}

fn message(event: &PipelineEvent) -> String {
    match event {
        PipelineEvent::WatchStarted { watching, ignoring } => {
            let mut msg = format!("Watching: {}", watching.join(", "));
            if !ignoring.is_empty() {
                msg.push_str(&format!(" (ignoring {})", ignoring.join(", ")));
            }
            msg
        }
        PipelineEvent::FileChanged { path, .. } => format!("Changed: {}", path),
        PipelineEvent::Unchanged { path } => format!("Unchanged: {}", path),
        PipelineEvent::CommitQueued { path } => format!("Commit queued: {}", path),
        PipelineEvent::CommitDequeued { path } => format!("Committing queued file: {}", path),
        PipelineEvent::CommitSucceeded { path, message } => {
            format!("Committed {} ({})", path, message)
        }
        PipelineEvent::CommitSkipped { path, reason } => {
            format!("Skipped commit of {}: {}", path, reason)
        }
        PipelineEvent::CommitFailed { path, message } => {
            format!("Commit failed for {}: {}", path, message)
        }
        PipelineEvent::Synced { source, destination } => {
            format!("Synced {} to {}", source, destination)
        }
        PipelineEvent::CacheInvalidated {
            host, reloaded, ..
        } => format!(
            "Changes applied to {}. Plugin cache cleared for: {}",
            host, reloaded
        ),
        PipelineEvent::LiveReloadTriggered { path } => format!("Live reload: {}", path),
        PipelineEvent::StylesheetCompiled { output } => format!("Compiled {}", output),
        PipelineEvent::StageFailed {
            stage,
            path,
            message,
        } => format!("{:?} failed for {}: {}", stage, path, message),
        PipelineEvent::ContentCacheCleared { entries } => {
            format!("Content cache cleared ({} entries)", entries)
        }
        PipelineEvent::Shutdown => "Watch stopped.".to_string(),
    }
}

pub fn render_pipeline_event(
    timestamp: &str,
    event: &PipelineEvent,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let prefix = ColoredText::dim(format!("[{}]", timestamp)).render(supports_color);
    let icon = icon_for(event).colored(supports_color, supports_unicode);
    let severity = event.severity();
    let text = match severity {
        Severity::Success | Severity::Error => {
            ColoredText::new(SemanticColor::from(severity), message(event)).render(supports_color)
        }
        _ => message(event),
    };

    let line = format!("{} {} {}\n", prefix, icon, text);
    if matches!(event, PipelineEvent::Shutdown) {
        format!("\n{}", line)
    } else {
        line
    }
}
