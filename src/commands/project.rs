use std::path::Path;

use anyhow::{bail, Result};

use plugin_sdk::config::{env_overrides, ConfigFile, Options};
use plugin_sdk::paths::Paths;

use crate::cli::ConfigArgs;
use crate::ui::context::UiContext;
use crate::ui::views::config::render_config_warning;

/// A resolved config and the paths derived from it
pub struct Project {
    pub options: Options,
    pub paths: Paths,
}

/// Load and resolve the config named by `--config`.
///
/// Unknown keys are reported before anything else runs. Layers: config file,
/// then `PLUGIN_SDK_*` variables, then command-line flags.
pub fn load_project(args: &ConfigArgs, ui: &UiContext) -> Result<Project> {
    let Some(name) = args.config.as_deref() else {
        bail!("no config selected; pass --config <name>");
    };

    let (file, warnings) = ConfigFile::load_with_warnings(&args.config_file)?;
    for warning in &warnings {
        if ui.json {
            let line = serde_json::json!({
                "event": "config_warning",
                "key": warning.key,
                "file": warning.file.display().to_string(),
                "line": warning.line,
                "suggestion": warning.suggestion,
            });
            eprintln!("{}", line);
        } else {
            eprint!("{}", render_config_warning(warning, ui.color, ui.unicode));
        }
    }

    let overrides = env_overrides(|key| std::env::var(key).ok()).overlay(args.overrides());
    let options = Options::resolve(&file, name, overrides)?;

    let cwd = std::env::current_dir()?;
    let paths = Paths::new(&options, &cwd);
    tracing::debug!(
        config = %name,
        plugin_dir = %paths.plugin_dir.display(),
        "resolved config"
    );

    Ok(Project { options, paths })
}

/// Display form of a path relative to the working directory when possible
pub fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(|p| p.display().to_string()))
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn quiet_ui() -> UiContext {
        UiContext::new(false, 0, Some(crate::cli::ColorWhen::Never))
    }

    #[test]
    fn missing_config_name_is_an_error() {
        let err = load_project(&ConfigArgs::default(), &quiet_ui())
            .err()
            .unwrap();
        assert!(err.to_string().contains("--config"));
    }

    #[test]
    fn unknown_config_name_is_an_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(
            &file,
            r#"
[configs.acme]
customer_id = "acme"
community_id = "acmecommunity"
plugin_id = "plug"
hostname = "acme.example.com"
sync_to_remote = false
"#,
        )
        .unwrap();

        let args = ConfigArgs {
            config: Some("other".to_string()),
            config_file: file,
            ..ConfigArgs::default()
        };
        let err = load_project(&args, &quiet_ui()).err().unwrap();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(
            &file,
            r#"
[configs.acme]
customer_id = "acme"
community_id = "acmecommunity"
plugin_id = "plug"
hostname = "acme.example.com"
sync_to_remote = false
auto_commit = true
"#,
        )
        .unwrap();

        let args = ConfigArgs {
            config: Some("acme".to_string()),
            config_file: file,
            auto_commit: Some(false),
            ..ConfigArgs::default()
        };
        let project = load_project(&args, &quiet_ui()).unwrap();
        assert!(!project.options.auto_commit);
        assert_eq!(project.paths.plugin_segment, "acme/plug/stage");
    }
}
