//! Configuration type definitions

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PathRewrite;
use crate::error::{SdkError, SdkResult};
use crate::paths::{self, ThemeLayer};

use super::loader::{self, ConfigWarning};

/// Name of the base layer in both `[configs]` and `[hosts]`.
pub const DEFAULT_LAYER: &str = "default";

/// On-disk configuration file.
///
/// ```toml
/// [configs.default]
/// plugin_path = "../plugins/custom"
///
/// [configs."acme.stage"]
/// customer_id = "acme"
/// community_id = "acme"
/// plugin_id = "acme"
/// hostname = "acme.stage.example.com"
/// host = "dev1"
///
/// [hosts.dev1]
/// host = "dev1.example.com"
/// ssh_username = "deploy"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub configs: BTreeMap<String, PartialOptions>,

    #[serde(default)]
    pub hosts: BTreeMap<String, HostConfig>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> SdkResult<Self> {
        Ok(loader::load_with_warnings(path)?.0)
    }

    /// Load configuration and collect non-fatal warnings (unknown keys).
    pub fn load_with_warnings(path: &Path) -> SdkResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    pub fn config_exists(&self, name: &str) -> bool {
        self.configs.contains_key(name)
    }
}

/// One `[configs.<name>]` layer. Every key is optional so layers can be stacked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialOptions {
    pub customer_id: Option<String>,
    pub community_id: Option<String>,
    pub plugin_id: Option<String>,
    pub phase: Option<String>,
    pub plugin_path: Option<PathBuf>,
    pub skin: Option<String>,
    pub compiled_skin_name: Option<String>,
    pub lia_release: Option<String>,
    pub responsive_version: Option<String>,
    pub tmp_path_base: Option<PathBuf>,
    pub host: Option<HostRef>,
    pub hostname: Option<String>,
    pub tapestry_context: Option<String>,
    pub https: Option<bool>,
    pub http_port: Option<u16>,
    pub https_port: Option<u16>,
    pub live_reload: Option<bool>,
    pub live_reload_port: Option<u16>,
    pub auto_commit: Option<bool>,
    pub sync_to_remote: Option<bool>,
    pub check_file_changed: Option<bool>,
    pub convert_local_sync_path: Option<Vec<PathRewriteConfig>>,
    pub ticket: Option<String>,
    pub theme: Option<bool>,
    pub theme_version: Option<String>,
    pub theme_base_version: Option<String>,
    pub theme_support_version: Option<String>,
    pub theme_marketing_version: Option<String>,
    pub debounce_ms: Option<u64>,
}

impl PartialOptions {
    /// Stack `top` over `self`; keys set in `top` win.
    pub fn overlay(self, top: PartialOptions) -> PartialOptions {
        PartialOptions {
            customer_id: top.customer_id.or(self.customer_id),
            community_id: top.community_id.or(self.community_id),
            plugin_id: top.plugin_id.or(self.plugin_id),
            phase: top.phase.or(self.phase),
            plugin_path: top.plugin_path.or(self.plugin_path),
            skin: top.skin.or(self.skin),
            compiled_skin_name: top.compiled_skin_name.or(self.compiled_skin_name),
            lia_release: top.lia_release.or(self.lia_release),
            responsive_version: top.responsive_version.or(self.responsive_version),
            tmp_path_base: top.tmp_path_base.or(self.tmp_path_base),
            host: top.host.or(self.host),
            hostname: top.hostname.or(self.hostname),
            tapestry_context: top.tapestry_context.or(self.tapestry_context),
            https: top.https.or(self.https),
            http_port: top.http_port.or(self.http_port),
            https_port: top.https_port.or(self.https_port),
            live_reload: top.live_reload.or(self.live_reload),
            live_reload_port: top.live_reload_port.or(self.live_reload_port),
            auto_commit: top.auto_commit.or(self.auto_commit),
            sync_to_remote: top.sync_to_remote.or(self.sync_to_remote),
            check_file_changed: top.check_file_changed.or(self.check_file_changed),
            convert_local_sync_path: top
                .convert_local_sync_path
                .or(self.convert_local_sync_path),
            ticket: top.ticket.or(self.ticket),
            theme: top.theme.or(self.theme),
            theme_version: top.theme_version.or(self.theme_version),
            theme_base_version: top.theme_base_version.or(self.theme_base_version),
            theme_support_version: top.theme_support_version.or(self.theme_support_version),
            theme_marketing_version: top
                .theme_marketing_version
                .or(self.theme_marketing_version),
            debounce_ms: top.debounce_ms.or(self.debounce_ms),
        }
    }
}

/// A `host` key: either an alias into `[hosts]` or an inline table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostRef {
    Alias(String),
    Inline(HostConfig),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    pub host: Option<String>,
    pub ssh_username: Option<String>,
    pub ssh_identity_file: Option<String>,
    pub rsync_path: Option<String>,
    pub remote_customer_root: Option<String>,
}

impl HostConfig {
    fn overlay(self, top: HostConfig) -> HostConfig {
        HostConfig {
            host: top.host.or(self.host),
            ssh_username: top.ssh_username.or(self.ssh_username),
            ssh_identity_file: top.ssh_identity_file.or(self.ssh_identity_file),
            rsync_path: top.rsync_path.or(self.rsync_path),
            remote_customer_root: top.remote_customer_root.or(self.remote_customer_root),
        }
    }
}

/// Windows-style path fixups applied to a local file before it is mirrored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRewriteConfig {
    pub reg_exp: String,
    pub replace_with: String,
}

/// Remote host after alias lookup and `hosts.default` merging.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedHost {
    pub host: Option<String>,
    pub ssh_username: Option<String>,
    pub ssh_identity_file: Option<PathBuf>,
    pub rsync_path: Option<String>,
    pub remote_customer_root: String,
}

/// Fully resolved and validated options handed to the watch core.
#[derive(Debug, Clone)]
pub struct Options {
    pub name: String,
    pub customer_id: String,
    pub community_id: String,
    pub plugin_id: String,
    pub phase: String,
    pub plugin_path: PathBuf,
    pub skin: String,
    pub compiled_skin_name: String,
    pub lia_release: String,
    pub responsive_version: String,
    pub tmp_path_base: PathBuf,
    pub host: ResolvedHost,
    pub hostname: String,
    pub tapestry_context: String,
    pub https: bool,
    pub http_port: u16,
    pub https_port: u16,
    pub live_reload: bool,
    pub live_reload_port: u16,
    pub auto_commit: bool,
    pub sync_to_remote: bool,
    pub check_file_changed: bool,
    pub convert_local_sync_path: Vec<PathRewrite>,
    pub ticket: Option<String>,
    /// Plugin-local community themes (`theme_version` entries) are compiled in
    pub theme: bool,
    pub theme_version: Option<String>,
    pub theme_base_version: Option<String>,
    pub theme_support_version: Option<String>,
    pub theme_marketing_version: Option<String>,
    pub debounce_ms: u64,
}

impl Options {
    /// Resolve `name` from the config file: built-in defaults, then
    /// `configs.default`, then `configs.<name>`, then `overrides`.
    pub fn resolve(file: &ConfigFile, name: &str, overrides: PartialOptions) -> SdkResult<Self> {
        let named = file.configs.get(name).cloned().ok_or_else(|| {
            SdkError::config(format!(
                "the config [{}] does not exist in your config file",
                name
            ))
        })?;
        let base = file.configs.get(DEFAULT_LAYER).cloned().unwrap_or_default();
        let merged = base.overlay(named).overlay(overrides);

        let host = resolve_host(file, merged.host.clone());

        let sync_to_remote = merged.sync_to_remote.unwrap_or(true);
        if sync_to_remote && host.host.is_none() {
            return Err(SdkError::config(
                "'host' is required when sync_to_remote is enabled",
            ));
        }

        let responsive_version = merged
            .responsive_version
            .unwrap_or_else(|| "2.0".to_string());
        if paths::responsive_version_path(&responsive_version).is_none() {
            return Err(SdkError::config(format!(
                "unknown responsive_version '{}'",
                responsive_version
            )));
        }
        check_theme_version(ThemeLayer::Base, &merged.theme_base_version)?;
        check_theme_version(ThemeLayer::Support, &merged.theme_support_version)?;
        check_theme_version(ThemeLayer::Marketing, &merged.theme_marketing_version)?;

        let convert_local_sync_path = merged
            .convert_local_sync_path
            .unwrap_or_default()
            .into_iter()
            .map(|c| PathRewrite::new(&c.reg_exp, c.replace_with))
            .collect::<SdkResult<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            customer_id: required(merged.customer_id, "customer_id")?,
            community_id: required(merged.community_id, "community_id")?,
            plugin_id: required(merged.plugin_id, "plugin_id")?,
            phase: merged.phase.unwrap_or_else(|| "stage".to_string()),
            plugin_path: merged
                .plugin_path
                .unwrap_or_else(|| PathBuf::from("../plugins/custom")),
            skin: merged.skin.unwrap_or_else(|| "responsive_peak".to_string()),
            compiled_skin_name: merged
                .compiled_skin_name
                .unwrap_or_else(|| "responsive_peak.css".to_string()),
            lia_release: merged.lia_release.unwrap_or_else(|| "16.10".to_string()),
            responsive_version,
            tmp_path_base: merged
                .tmp_path_base
                .unwrap_or_else(|| PathBuf::from("./.tmp")),
            host,
            hostname: required(merged.hostname, "hostname")?,
            tapestry_context: merged.tapestry_context.unwrap_or_else(|| "t5".to_string()),
            https: merged.https.unwrap_or(true),
            http_port: merged.http_port.unwrap_or(80),
            https_port: merged.https_port.unwrap_or(443),
            live_reload: merged.live_reload.unwrap_or(true),
            live_reload_port: merged.live_reload_port.unwrap_or(35729),
            auto_commit: merged.auto_commit.unwrap_or(true),
            sync_to_remote,
            check_file_changed: merged.check_file_changed.unwrap_or(true),
            convert_local_sync_path,
            ticket: merged.ticket.filter(|t| !t.trim().is_empty()),
            theme: merged.theme.unwrap_or(false),
            theme_version: merged.theme_version.filter(|v| !v.trim().is_empty()),
            theme_base_version: merged.theme_base_version,
            theme_support_version: merged.theme_support_version,
            theme_marketing_version: merged.theme_marketing_version,
            debounce_ms: merged.debounce_ms.unwrap_or(250),
        })
    }

    /// Whether any of the core theme layers is in use
    pub fn uses_core_theme(&self) -> bool {
        self.theme_base_version.is_some()
            || self.theme_support_version.is_some()
            || self.theme_marketing_version.is_some()
    }
}

fn required(value: Option<String>, key: &str) -> SdkResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SdkError::config(format!("missing required option '{}'", key)))
}

fn check_theme_version(layer: ThemeLayer, version: &Option<String>) -> SdkResult<()> {
    match version {
        Some(v) if layer.version_path(v).is_none() => Err(SdkError::config(format!(
            "unknown {} version '{}'",
            layer.name(),
            v
        ))),
        _ => Ok(()),
    }
}

fn resolve_host(file: &ConfigFile, host: Option<HostRef>) -> ResolvedHost {
    let base = file.hosts.get(DEFAULT_LAYER).cloned().unwrap_or_default();
    let named = match host {
        Some(HostRef::Alias(alias)) => {
            let mut found = file.hosts.get(&alias).cloned().unwrap_or_default();
            found.host = found.host.or(Some(alias));
            found
        }
        Some(HostRef::Inline(inline)) => inline,
        None => HostConfig::default(),
    };
    let merged = base.overlay(named);

    ResolvedHost {
        host: merged.host,
        ssh_username: merged.ssh_username,
        ssh_identity_file: merged.ssh_identity_file.map(|p| expand_home(&p)),
        rsync_path: merged.rsync_path,
        remote_customer_root: merged
            .remote_customer_root
            .unwrap_or_else(|| "/home/lithium/customer".to_string()),
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
