//! Local, temporary and remote paths derived from resolved options

use std::path::{Component, Path, PathBuf};

use crate::config::Options;

/// Responsive release folder for a configured responsive version.
pub fn responsive_version_path(version: &str) -> Option<&'static str> {
    Some(match version {
        "1" | "1.0" => "v1-lia15.8",
        "1.1" => "v1.1-lia15.9",
        "1.2" => "v1.2-lia15.10",
        "1.3" => "v1.3-lia15.11",
        "1.4" => "v1.4-lia15.12",
        "1.5" => "v1.5-lia16.0",
        "1.6" => "v1.6-lia16.1",
        "1.7" => "v1.7-lia16.2",
        "1.8" => "v1.8-lia16.3",
        "1.9" => "v1.9-lia16.4",
        "1.10" => "v1.10-lia16.5",
        "2" | "2.0" => "v2-lia16.6",
        _ => return None,
    })
}

fn is_responsive_v2(version: &str) -> bool {
    matches!(version, "2" | "2.0")
}

/// One of the core community theme layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeLayer {
    Base,
    Support,
    Marketing,
}

impl ThemeLayer {
    pub fn name(&self) -> &'static str {
        match self {
            ThemeLayer::Base => "theme-base",
            ThemeLayer::Support => "theme-support",
            ThemeLayer::Marketing => "theme-marketing",
        }
    }

    pub fn version_path(&self, version: &str) -> Option<&'static str> {
        match (self, version) {
            (ThemeLayer::Base | ThemeLayer::Support, "1" | "1.0") => Some("v1-lia17.8"),
            (ThemeLayer::Base | ThemeLayer::Support, "1.1") => Some("v1.1-lia17.9"),
            (ThemeLayer::Marketing, "1" | "1.0") => Some("v1-lia17.9"),
            _ => None,
        }
    }
}

/// All paths the tool touches for one resolved config.
#[derive(Debug, Clone)]
pub struct Paths {
    /// `{customer}/{plugin}/{phase}`, the plugin root segment
    pub plugin_segment: String,
    /// Local checkout of the plugin
    pub plugin_dir: PathBuf,
    pub skin_dir: PathBuf,
    pub skin_entry: PathBuf,
    pub tmp_customer_dir: PathBuf,
    pub tmp_plugin_no_release_dir: PathBuf,
    pub tmp_plugin_dir: PathBuf,
    pub tmp_compile_styles_dir: PathBuf,
    /// `host:/.../plugins`
    pub server_plugins: String,
    pub server_plugins_custom: String,
    pub server_core_angular_li: String,
    pub server_core_theme: String,
    pub plugin_reload_url: String,
    release: String,
    skin: String,
    responsive_version: String,
    themes: Vec<(ThemeLayer, &'static str)>,
    community_themes: Vec<String>,
}

impl Paths {
    /// Derive paths, resolving a relative `plugin_path` against `cwd`.
    pub fn new(options: &Options, cwd: &Path) -> Self {
        let plugin_segment = format!(
            "{}/{}/{}",
            options.customer_id, options.plugin_id, options.phase
        );
        let plugin_root = absolutize(cwd, &options.plugin_path);
        let plugin_dir = plugin_root
            .join(&options.customer_id)
            .join(&options.plugin_id)
            .join(&options.phase);
        let skin_dir = plugin_dir.join("res").join("skins");
        let skin_entry = skin_dir.join(&options.skin).join("sass").join("skin.scss");

        let tmp_base = absolutize(cwd, &options.tmp_path_base);
        let tmp_customer_dir = tmp_base
            .join("plugins")
            .join(&options.customer_id)
            .join(&options.community_id)
            .join(&options.phase);
        let release = if options.lia_release == "active" {
            "active".to_string()
        } else {
            format!("{}-release", options.lia_release)
        };
        let tmp_plugin_no_release_dir = tmp_customer_dir.join("plugin");
        let tmp_plugin_dir = tmp_plugin_no_release_dir.join(&release);
        let tmp_compile_styles_dir = tmp_customer_dir.join("compiled").join("styles");

        let host = options.host.host.clone().unwrap_or_default();
        let server = match &options.host.ssh_username {
            Some(user) => format!("{}@{}", user, host),
            None => host,
        };
        let server_plugins = format!(
            "{}:{}/{}.{}/plugins",
            server,
            options.host.remote_customer_root.trim_end_matches('/'),
            options.community_id,
            options.phase
        );
        let server_plugins_custom = format!("{}/custom/{}", server_plugins, plugin_segment);
        let server_core_angular_li =
            format!("{}/core/lithium/angular-li/{}", server_plugins, release);
        let server_core_theme = format!("{}/core/lithium/themes/{}", server_plugins, release);

        let themes = [
            (ThemeLayer::Base, &options.theme_base_version),
            (ThemeLayer::Support, &options.theme_support_version),
            (ThemeLayer::Marketing, &options.theme_marketing_version),
        ]
        .into_iter()
        .filter_map(|(layer, version)| {
            let version = version.as_deref()?;
            layer.version_path(version).map(|p| (layer, p))
        })
        .collect();

        let community_themes = if options.theme {
            community_theme_paths(&plugin_root, options.theme_version.as_deref().unwrap_or(""))
        } else {
            Vec::new()
        };

        Self {
            plugin_segment,
            plugin_dir,
            skin_dir,
            skin_entry,
            tmp_customer_dir,
            tmp_plugin_no_release_dir,
            tmp_plugin_dir,
            tmp_compile_styles_dir,
            server_plugins,
            server_plugins_custom,
            server_core_angular_li,
            server_core_theme,
            plugin_reload_url: plugin_reload_url(options),
            release,
            skin: options.skin.clone(),
            responsive_version: options.responsive_version.clone(),
            themes,
            community_themes,
        }
    }

    /// Glob for the skin's stylesheet sources
    pub fn stylesheet_glob(&self) -> String {
        format!(
            "{}/res/skins/{}/sass/**/*.scss",
            self.plugin_dir_glob(),
            globset::escape(&self.skin)
        )
    }

    /// Globs for plugin assets that are pushed to the remote
    pub fn asset_globs(&self) -> Vec<String> {
        vec![format!("{}/{{res,web}}/**/*.*", self.plugin_dir_glob())]
    }

    /// Globs excluded from the asset pipeline
    pub fn asset_ignore_globs(&self) -> Vec<String> {
        vec![
            "**/*.scss".to_string(),
            format!("{}/res/compiledskin/**", self.plugin_dir_glob()),
        ]
    }

    /// Plugin directory with glob metacharacters escaped
    fn plugin_dir_glob(&self) -> String {
        globset::escape(&slash(&self.plugin_dir))
    }

    /// Core responsive skin directories, relative to the remote core tree
    /// (`for_remote`) or absolute inside the local tmp copy.
    pub fn core_sass_paths(&self, for_remote: bool) -> Vec<String> {
        let prefix = self.prefix(for_remote);
        // validated in Options::resolve
        let version = responsive_version_path(&self.responsive_version).unwrap_or_default();
        let v2 = is_responsive_v2(&self.responsive_version);

        let mut paths = Vec::new();
        if !v2 {
            paths.push(format!(
                "{}/res/feature/responsivebase/{}/res/skins",
                prefix, version
            ));
        }
        paths.push(format!(
            "{}/res/feature/responsivepeak/{}/res/skins",
            prefix, version
        ));
        if !v2 {
            paths.push(format!("{}/res/feature/responsivebase/common/res/skins", prefix));
        }
        paths.push(format!("{}/res/feature/responsivepeak/common/res/skins", prefix));
        if !for_remote {
            paths.extend(self.community_themes.iter().cloned());
        }
        paths
    }

    /// Core community theme skin directories for the configured theme layers.
    pub fn theme_sass_paths(&self, for_remote: bool) -> Vec<String> {
        let prefix = self.prefix(for_remote);
        self.themes
            .iter()
            .map(|(layer, version)| {
                format!("{}/res/feature/{}/{}/res/skins", prefix, layer.name(), version)
            })
            .collect()
    }

    /// Include paths handed to the stylesheet compiler
    pub fn include_paths(&self) -> Vec<PathBuf> {
        std::iter::once(self.skin_dir.clone())
            .chain(self.core_sass_paths(false).into_iter().map(PathBuf::from))
            .chain(self.theme_sass_paths(false).into_iter().map(PathBuf::from))
            .collect()
    }

    pub fn compiled_stylesheet(&self, compiled_skin_name: &str) -> PathBuf {
        self.tmp_compile_styles_dir.join(compiled_skin_name)
    }

    fn prefix(&self, for_remote: bool) -> String {
        if for_remote {
            self.release.clone()
        } else {
            slash(&self.tmp_plugin_dir)
        }
    }
}

/// Skin sources of plugin-local community themes.
///
/// `theme_version` is a comma-separated list of plugin paths such as
/// `/communitythemes/base-1.0`; the theme name is the third path segment up to
/// the first `-`, with `base` stored as `base_theme`.
fn community_theme_paths(plugin_root: &Path, theme_version: &str) -> Vec<String> {
    let root = slash(plugin_root);
    theme_version
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let Some(segment) = entry.split('/').nth(2) else {
                tracing::warn!(entry, "ignoring malformed community theme path");
                return None;
            };
            let name = match segment.split('-').next().unwrap_or(segment) {
                "base" => "base_theme",
                other => other,
            };
            Some(format!("{}{}/res/skins/{}/sass", root, entry, name))
        })
        .collect()
}

fn plugin_reload_url(options: &Options) -> String {
    let (scheme, port, default_port) = if options.https {
        ("https", options.https_port, 443)
    } else {
        ("http", options.http_port, 80)
    };
    let port = if port == default_port {
        String::new()
    } else {
        format!(":{}", port)
    };
    format!(
        "{}://{}{}/{}/api/plugin",
        scheme, options.hostname, port, options.tapestry_context
    )
}

/// Forward-slash rendering of a path, for globs and remote paths
pub fn slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    if let Ok(canonical) = joined.canonicalize() {
        return canonical;
    }

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigFile, Options, PartialOptions};

    fn options(extra: &str) -> Options {
        let toml = format!(
            r#"
[configs.default]
plugin_path = "/work/plugins/custom"
tmp_path_base = "/work/.tmp"

[configs."acme.stage"]
customer_id = "acme"
community_id = "acmecomm"
plugin_id = "acmeplug"
hostname = "acme.example.com"
host = "dev1"
{extra}

[hosts.dev1]
host = "dev1.example.com"
ssh_username = "deploy"
"#
        );
        let file: ConfigFile = toml::from_str(&toml).unwrap();
        Options::resolve(&file, "acme.stage", PartialOptions::default()).unwrap()
    }

    #[test]
    fn plugin_paths_follow_customer_plugin_phase() {
        let paths = Paths::new(&options(""), Path::new("/"));
        assert_eq!(paths.plugin_segment, "acme/acmeplug/stage");
        assert_eq!(
            paths.plugin_dir,
            PathBuf::from("/work/plugins/custom/acme/acmeplug/stage")
        );
        assert_eq!(
            paths.skin_entry,
            PathBuf::from(
                "/work/plugins/custom/acme/acmeplug/stage/res/skins/responsive_peak/sass/skin.scss"
            )
        );
    }

    #[test]
    fn remote_paths_use_ssh_user_and_release() {
        let paths = Paths::new(&options(""), Path::new("/"));
        assert_eq!(
            paths.server_plugins_custom,
            "deploy@dev1.example.com:/home/lithium/customer/acmecomm.stage/plugins/custom/acme/acmeplug/stage"
        );
        assert!(paths
            .server_core_angular_li
            .ends_with("/plugins/core/lithium/angular-li/16.10-release"));
    }

    #[test]
    fn active_release_is_not_suffixed() {
        let paths = Paths::new(&options(r#"lia_release = "active""#), Path::new("/"));
        assert!(paths.server_core_theme.ends_with("/core/lithium/themes/active"));
        assert!(paths.tmp_plugin_dir.ends_with("plugin/active"));
    }

    #[test]
    fn reload_url_omits_default_port() {
        let paths = Paths::new(&options(""), Path::new("/"));
        assert_eq!(paths.plugin_reload_url, "https://acme.example.com/t5/api/plugin");

        let paths = Paths::new(
            &options("https = false\nhttp_port = 8080"),
            Path::new("/"),
        );
        assert_eq!(
            paths.plugin_reload_url,
            "http://acme.example.com:8080/t5/api/plugin"
        );
    }

    #[test]
    fn responsive_v2_only_includes_peak() {
        let paths = Paths::new(&options(""), Path::new("/"));
        let core = paths.core_sass_paths(true);
        assert_eq!(
            core,
            vec![
                "16.10-release/res/feature/responsivepeak/v2-lia16.6/res/skins".to_string(),
                "16.10-release/res/feature/responsivepeak/common/res/skins".to_string(),
            ]
        );
    }

    #[test]
    fn responsive_v1_includes_base_and_peak() {
        let paths = Paths::new(&options(r#"responsive_version = "1.5""#), Path::new("/"));
        assert_eq!(paths.core_sass_paths(true).len(), 4);
    }

    #[test]
    fn theme_paths_only_for_configured_layers() {
        let paths = Paths::new(&options(r#"theme_base_version = "1.1""#), Path::new("/"));
        assert_eq!(
            paths.theme_sass_paths(true),
            vec!["16.10-release/res/feature/theme-base/v1.1-lia17.9/res/skins".to_string()]
        );
    }

    #[test]
    fn relative_plugin_path_is_resolved_against_cwd() {
        let mut opts = options("");
        opts.plugin_path = PathBuf::from("../plugins/custom");
        let paths = Paths::new(&opts, Path::new("/nonexistent-root/sdk"));
        assert_eq!(
            paths.plugin_dir,
            PathBuf::from("/nonexistent-root/plugins/custom/acme/acmeplug/stage")
        );
    }

    #[test]
    fn community_themes_add_plugin_local_includes() {
        let paths = Paths::new(
            &options(
                r#"theme = true
theme_version = "/communitythemes/base-1.0, /communitythemes/support-2.1""#,
            ),
            Path::new("/"),
        );
        let local = paths.core_sass_paths(false);
        assert_eq!(
            &local[local.len() - 2..],
            &[
                "/work/plugins/custom/communitythemes/base-1.0/res/skins/base_theme/sass".to_string(),
                "/work/plugins/custom/communitythemes/support-2.1/res/skins/support/sass".to_string(),
            ]
        );
        assert_eq!(paths.core_sass_paths(true).len(), 2);
        assert!(paths.include_paths().contains(&PathBuf::from(
            "/work/plugins/custom/communitythemes/base-1.0/res/skins/base_theme/sass"
        )));
    }

    #[test]
    fn community_themes_ignored_unless_enabled() {
        let paths = Paths::new(
            &options(r#"theme_version = "/communitythemes/base-1.0""#),
            Path::new("/"),
        );
        assert_eq!(paths.core_sass_paths(false).len(), 2);
    }

    #[test]
    fn watch_globs_escape_plugin_dir_metacharacters() {
        let mut opts = options("");
        opts.plugin_path = PathBuf::from("/nonexistent/work[2]/{plugins}");
        let paths = Paths::new(&opts, Path::new("/"));

        let assets = crate::application::watch::WatchRoute::new(
            crate::application::watch::PipelineKind::Asset,
            &paths.asset_globs(),
            &paths.asset_ignore_globs(),
        )
        .unwrap();
        assert!(assets.matches(Path::new(
            "/nonexistent/work[2]/{plugins}/acme/acmeplug/stage/web/a.js"
        )));
        assert!(!assets.matches(Path::new(
            "/nonexistent/work[2]/{plugins}/acme/acmeplug/stage/res/compiledskin/a.css"
        )));

        let stylesheets = crate::application::watch::WatchRoute::new(
            crate::application::watch::PipelineKind::Stylesheet,
            &[paths.stylesheet_glob()],
            &[],
        )
        .unwrap();
        assert!(stylesheets.matches(Path::new(
            "/nonexistent/work[2]/{plugins}/acme/acmeplug/stage/res/skins/responsive_peak/sass/skin.scss"
        )));
    }

    #[test]
    fn asset_globs_cover_res_and_web() {
        let paths = Paths::new(&options(""), Path::new("/"));
        assert_eq!(
            paths.asset_globs(),
            vec!["/work/plugins/custom/acme/acmeplug/stage/{res,web}/**/*.*".to_string()]
        );
        assert!(paths.asset_ignore_globs()[1].ends_with("/res/compiledskin/**"));
    }
}
