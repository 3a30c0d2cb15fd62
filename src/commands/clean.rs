use anyhow::Result;

use plugin_sdk::infrastructure::fs::remove_dir_if_exists;

use crate::cli::ConfigArgs;
use crate::commands::project::{display_path, load_project};
use crate::ui::context::UiContext;
use crate::ui::views::pull::render_clean;

pub fn cmd_clean(args: &ConfigArgs, ui: &UiContext) -> Result<()> {
    let project = load_project(args, ui)?;
    let tmp = std::env::current_dir()?.join(&project.options.tmp_path_base);

    let removed = remove_dir_if_exists(&tmp)?;
    tracing::debug!(path = %tmp.display(), removed, "clean");

    if ui.json {
        let line = serde_json::json!({
            "event": "clean_complete",
            "command": "clean",
            "path": tmp.display().to_string(),
            "removed": removed,
        });
        println!("{}", line);
    } else {
        print!(
            "{}",
            render_clean(&display_path(&tmp), removed, ui.color, ui.unicode)
        );
    }
    Ok(())
}
