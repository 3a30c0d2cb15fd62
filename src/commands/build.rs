use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use plugin_sdk::application::StylesheetBuilder;
use plugin_sdk::infrastructure::SassCli;

use crate::cli::ConfigArgs;
use crate::commands::project::{display_path, load_project, Project};
use crate::commands::pull::pull_skins;
use crate::ui::context::UiContext;
use crate::ui::views::pull::render_build_complete;

pub fn cmd_build(args: &ConfigArgs, no_pull: bool, ui: &UiContext) -> Result<()> {
    let project = load_project(args, ui)?;
    build_skin(&project, no_pull, ui)?;
    Ok(())
}

pub(crate) fn stylesheet_builder(project: &Project) -> StylesheetBuilder {
    StylesheetBuilder::from_paths(
        Arc::new(SassCli::default()),
        &project.paths,
        &project.options.compiled_skin_name,
    )
}

/// Pull (unless `no_pull`), then compile the skin stylesheet.
pub(crate) fn build_skin(project: &Project, no_pull: bool, ui: &UiContext) -> Result<PathBuf> {
    if !no_pull {
        pull_skins(project, ui)?;
    }

    let output = stylesheet_builder(project).build()?;
    if ui.json {
        let line = serde_json::json!({
            "event": "build_complete",
            "command": "build",
            "output": output.display().to_string(),
        });
        println!("{}", line);
    } else {
        print!(
            "{}",
            render_build_complete(&display_path(&output), ui.color, ui.unicode)
        );
    }
    Ok(output)
}
