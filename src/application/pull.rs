//! Pull remote core stylesheets into the local tmp tree

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::ports::{Mirror, MirrorRequest};
use crate::error::SdkResult;
use crate::paths::{slash, Paths};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PullKind {
    /// Responsive core skins
    Core,
    /// Community theme layers
    Theme,
}

impl PullKind {
    pub fn label(&self) -> &'static str {
        match self {
            PullKind::Core => "core",
            PullKind::Theme => "theme",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullReport {
    pub kind: PullKind,
    pub transferred: usize,
}

impl PullReport {
    pub fn already_in_sync(&self) -> bool {
        self.transferred == 0
    }
}

pub struct SkinPull {
    mirror: Arc<dyn Mirror>,
    core_source: String,
    theme_source: String,
    core_paths: Vec<String>,
    theme_paths: Vec<String>,
    destination: PathBuf,
}

impl SkinPull {
    pub fn new(paths: &Paths, mirror: Arc<dyn Mirror>) -> Self {
        Self {
            mirror,
            core_source: paths.server_core_angular_li.clone(),
            theme_source: paths.server_core_theme.clone(),
            core_paths: paths.core_sass_paths(true),
            theme_paths: paths.theme_sass_paths(true),
            destination: paths.tmp_plugin_no_release_dir.clone(),
        }
    }

    /// Whether any theme layer is configured
    pub fn has_theme(&self) -> bool {
        !self.theme_paths.is_empty()
    }

    /// Mirror request for `kind`: only the skin trees, `web/` and the
    /// directories leading to them.
    pub fn request(&self, kind: PullKind) -> MirrorRequest {
        let (source, skin_paths) = match kind {
            PullKind::Core => (&self.core_source, &self.core_paths),
            PullKind::Theme => (&self.theme_source, &self.theme_paths),
        };

        let mut include: Vec<String> = skin_paths.iter().map(|p| format!("{}/***", p)).collect();
        include.push("web/***".to_string());
        include.push("*/".to_string());

        MirrorRequest {
            source: source.clone(),
            destination: slash(&self.destination),
            include,
            exclude: vec!["*".to_string()],
        }
    }

    pub fn pull(&self, kind: PullKind) -> SdkResult<PullReport> {
        std::fs::create_dir_all(&self.destination)?;
        let request = self.request(kind);
        tracing::info!(
            kind = kind.label(),
            source = %request.source,
            "syncing skins from remote to local"
        );
        let report = self.mirror.mirror(&request)?;
        Ok(PullReport {
            kind,
            transferred: report.transferred,
        })
    }

    /// Core skins, then theme skins when a theme layer is configured.
    pub fn pull_all(&self) -> SdkResult<Vec<PullReport>> {
        let mut reports = vec![self.pull(PullKind::Core)?];
        if self.has_theme() {
            reports.push(self.pull(PullKind::Theme)?);
        }
        Ok(reports)
    }
}
