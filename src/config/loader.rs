//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SdkError, SdkResult};

use super::types::{ConfigFile, PartialOptions};

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> SdkResult<(ConfigFile, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| {
        SdkError::config(format!("error reading {}: {}", path.display(), e))
    })?;
    parse_with_warnings(path, &content)
}

pub(crate) fn parse_with_warnings(
    path: &Path,
    content: &str,
) -> SdkResult<(ConfigFile, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: ConfigFile = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| SdkError::config(format!("invalid {}: {}", path.display(), e)))?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Overrides read from `PLUGIN_SDK_*` environment variables.
///
/// These sit between the config file and CLI flags.
pub fn env_overrides(get_env: impl Fn(&str) -> Option<String>) -> PartialOptions {
    let flag = |key: &str| {
        get_env(key).map(|val| {
            let val = val.to_lowercase();
            val != "false" && val != "0"
        })
    };

    PartialOptions {
        auto_commit: flag("PLUGIN_SDK_AUTO_COMMIT"),
        sync_to_remote: flag("PLUGIN_SDK_SYNC_TO_REMOTE"),
        live_reload: flag("PLUGIN_SDK_LIVE_RELOAD"),
        check_file_changed: flag("PLUGIN_SDK_CHECK_FILE_CHANGED"),
        ticket: get_env("PLUGIN_SDK_TICKET"),
        ..PartialOptions::default()
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "configs",
        "hosts",
        "customer_id",
        "community_id",
        "plugin_id",
        "phase",
        "plugin_path",
        "skin",
        "compiled_skin_name",
        "lia_release",
        "responsive_version",
        "tmp_path_base",
        "host",
        "hostname",
        "tapestry_context",
        "https",
        "http_port",
        "https_port",
        "live_reload",
        "live_reload_port",
        "auto_commit",
        "sync_to_remote",
        "check_file_changed",
        "convert_local_sync_path",
        "reg_exp",
        "replace_with",
        "ticket",
        "theme",
        "theme_version",
        "theme_base_version",
        "theme_support_version",
        "theme_marketing_version",
        "debounce_ms",
        "ssh_username",
        "ssh_identity_file",
        "rsync_path",
        "remote_customer_root",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
