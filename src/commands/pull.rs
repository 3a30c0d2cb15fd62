use std::sync::Arc;

use anyhow::Result;

use plugin_sdk::application::{PullReport, SkinPull};
use plugin_sdk::infrastructure::RsyncMirror;

use crate::cli::ConfigArgs;
use crate::commands::project::{load_project, Project};
use crate::ui::context::UiContext;
use crate::ui::views::pull::render_pull_report;

pub fn cmd_pull(args: &ConfigArgs, ui: &UiContext) -> Result<()> {
    let project = load_project(args, ui)?;
    pull_skins(&project, ui)?;
    Ok(())
}

/// Mirror the remote core (and theme) skins into the tmp directory.
pub(crate) fn pull_skins(project: &Project, ui: &UiContext) -> Result<Vec<PullReport>> {
    let mirror = Arc::new(RsyncMirror::for_host(&project.options.host));
    let reports = SkinPull::new(&project.paths, mirror).pull_all()?;

    for report in &reports {
        if ui.json {
            let line = serde_json::json!({
                "event": "pull_complete",
                "command": "pull",
                "kind": report.kind.label(),
                "transferred": report.transferred,
            });
            println!("{}", line);
        } else {
            print!("{}", render_pull_report(report, ui.color, ui.unicode));
        }
    }
    Ok(reports)
}
