//! Hook settings.
//!
//! The host passes no configuration of its own, so settings come from the
//! environment, optionally seeded from a `.env` file next to the plugin.

use std::path::Path;
use std::time::Duration;

use super::graphql::DEFAULT_TIMEOUT_SECS;

/// Merge the event's full tag list, not just its primary tag.
pub const ALL_TAGS_VAR: &str = "MARKER_TAG_ALL_TAGS";
/// GraphQL request timeout in seconds.
pub const TIMEOUT_VAR: &str = "MARKER_TAG_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookSettings {
    pub all_tags: bool,
    pub request_timeout: Duration,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            all_tags: false,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl HookSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults for missing
    /// or unparseable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let all_tags = match lookup(ALL_TAGS_VAR) {
            None => defaults.all_tags,
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Ignoring unrecognised {ALL_TAGS_VAR}");
                defaults.all_tags
            }),
        };

        let request_timeout = match lookup(TIMEOUT_VAR) {
            None => defaults.request_timeout,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(value = %raw, "Ignoring invalid {TIMEOUT_VAR}");
                    defaults.request_timeout
                }
            },
        };

        Self {
            all_tags,
            request_timeout,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Load `.env.local` then `.env` from the plugin directory, if present.
///
/// Variables already set in the environment win over file values.
pub fn load_plugin_env(plugin_dir: Option<&Path>) {
    let Some(dir) = plugin_dir else {
        return;
    };

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = dir.join(filename);
        if path.exists() {
            if let Err(e) = dotenvy::from_path(&path) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load env file");
            }
        }
    }
}
