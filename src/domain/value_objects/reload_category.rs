//! Reload category value object
//!
//! Classifies a changed plugin file into the remote cache that has to be
//! cleared for it.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};

/// Remote plugin cache scoped by a reload request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReloadCategory {
    SkinsImages,
    Skins,
    Quilts,
    Layouts,
    Orders,
    Features,
    Forms,
    Lang,
    Components,
    Scripts,
    /// Nothing more specific matched; reload everything
    All,
}

/// Classification table, scanned in order. First match wins.
const PATTERNS: &[(ReloadCategory, &[&str])] = &[
    (ReloadCategory::SkinsImages, &["**/skins/**/images/**"]),
    (ReloadCategory::Skins, &["**/skins/**"]),
    (ReloadCategory::Quilts, &["**/quilts/**"]),
    (ReloadCategory::Layouts, &["**/layouts/**"]),
    (ReloadCategory::Orders, &["**/orders/**"]),
    (ReloadCategory::Features, &["**/feature/*.xml"]),
    (ReloadCategory::Forms, &["**/forms/**"]),
    (ReloadCategory::Lang, &["**/lang/**", "**/*.text.*.json"]),
    (ReloadCategory::Components, &["**/components/**"]),
    (
        ReloadCategory::Scripts,
        &[
            "**/*.js",
            "**/*.tpl.html",
            "**/sdk.conf.json",
            "**/dependencies.json",
        ],
    ),
];

static MATCHERS: LazyLock<Vec<(ReloadCategory, GlobSet)>> = LazyLock::new(|| {
    PATTERNS
        .iter()
        .filter_map(|(category, patterns)| {
            let mut builder = GlobSetBuilder::new();
            for pattern in *patterns {
                builder.add(path_glob(pattern).ok()?);
            }
            builder.build().ok().map(|set| (*category, set))
        })
        .collect()
});

/// Glob where `*` stops at `/`, matching shell/minimatch semantics.
pub fn path_glob(pattern: &str) -> Result<Glob, globset::Error> {
    GlobBuilder::new(pattern).literal_separator(true).build()
}

impl ReloadCategory {
    /// Classify a changed file by its full path.
    pub fn classify(path: &Path) -> Self {
        let normalized = path.to_string_lossy().replace('\\', "/");
        MATCHERS
            .iter()
            .find(|(_, set)| set.is_match(&normalized))
            .map(|(category, _)| *category)
            .unwrap_or(ReloadCategory::All)
    }

    /// Query-string key understood by the remote plugin endpoint
    pub fn query_key(&self) -> &'static str {
        match self {
            ReloadCategory::SkinsImages => "skins/images",
            ReloadCategory::Skins => "skins",
            ReloadCategory::Quilts => "quilts",
            ReloadCategory::Layouts => "layouts",
            ReloadCategory::Orders => "orders",
            ReloadCategory::Features => "features",
            ReloadCategory::Forms => "forms",
            ReloadCategory::Lang => "lang",
            ReloadCategory::Components => "components",
            ReloadCategory::Scripts => "scripts",
            ReloadCategory::All => "all",
        }
    }

    /// Query pairs for the reload request (`<key>=true`)
    pub fn query(&self) -> [(&'static str, &'static str); 1] {
        [(self.query_key(), "true")]
    }
}

impl fmt::Display for ReloadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.query_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLUGIN: &str = "/work/plugins/custom/acme/plug/stage";

    fn classify(rel: &str) -> ReloadCategory {
        ReloadCategory::classify(Path::new(&format!("{}/{}", PLUGIN, rel)))
    }

    #[test]
    fn skin_sources_are_skins() {
        assert_eq!(
            classify("res/skins/foo/sass/skin.scss"),
            ReloadCategory::Skins
        );
    }

    #[test]
    fn skin_images_win_over_skins() {
        assert_eq!(
            classify("res/skins/foo/images/logo.png"),
            ReloadCategory::SkinsImages
        );
    }

    #[test]
    fn feature_xml_is_features() {
        assert_eq!(classify("res/feature/bar.xml"), ReloadCategory::Features);
    }

    #[test]
    fn feature_star_does_not_cross_directories() {
        assert_eq!(classify("res/feature/nested/bar.xml"), ReloadCategory::All);
    }

    #[test]
    fn unmatched_path_reloads_all() {
        assert_eq!(classify("README.md"), ReloadCategory::All);
        assert_eq!(ReloadCategory::All.query(), [("all", "true")]);
    }

    #[test]
    fn lang_matches_directory_and_text_bundles() {
        assert_eq!(classify("res/lang/en.properties"), ReloadCategory::Lang);
        assert_eq!(
            classify("web/src/foo.text.en.json"),
            ReloadCategory::Lang
        );
    }

    #[test]
    fn scripts_cover_js_templates_and_sdk_files() {
        assert_eq!(classify("web/src/app.js"), ReloadCategory::Scripts);
        assert_eq!(classify("web/src/view.tpl.html"), ReloadCategory::Scripts);
        assert_eq!(classify("web/sdk.conf.json"), ReloadCategory::Scripts);
        assert_eq!(classify("web/dependencies.json"), ReloadCategory::Scripts);
    }

    #[test]
    fn first_match_wins_over_later_categories() {
        // matches both skins and scripts
        assert_eq!(classify("res/skins/foo/js/app.js"), ReloadCategory::Skins);
        assert_eq!(
            classify("web/components/widget/widget.js"),
            ReloadCategory::Components
        );
    }

    #[test]
    fn windows_separators_are_normalized() {
        assert_eq!(
            ReloadCategory::classify(Path::new(r"C:\work\res\quilts\main.quilt.xml")),
            ReloadCategory::Quilts
        );
    }

    #[test]
    fn query_key_for_skin_images() {
        assert_eq!(ReloadCategory::SkinsImages.query_key(), "skins/images");
        assert_eq!(ReloadCategory::Orders.to_string(), "orders");
    }
}
