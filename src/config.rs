//! Environment-derived settings.

use std::env;

use tracing::warn;

/// Default git executable name.
pub const DEFAULT_GIT_BIN: &str = "git";

/// Environment variable to override the git executable.
pub const GIT_BIN_ENV_VAR: &str = "QUICKPUSH_GIT";

/// Environment variable to skip the final press-any-key pause.
pub const NO_PAUSE_ENV_VAR: &str = "QUICKPUSH_NO_PAUSE";

/// Settings that come from the environment rather than CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub git_bin: String,
    pub no_pause: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            git_bin: DEFAULT_GIT_BIN.to_string(),
            no_pause: false,
        }
    }
}

impl Settings {
    /// Read settings from `QUICKPUSH_GIT` and `QUICKPUSH_NO_PAUSE`.
    ///
    /// Unset or empty variables fall back to defaults. An unparseable
    /// `QUICKPUSH_NO_PAUSE` logs a warning and is treated as unset.
    pub fn from_env() -> Self {
        let git_bin = match env::var(GIT_BIN_ENV_VAR) {
            Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => DEFAULT_GIT_BIN.to_string(),
        };

        let no_pause = match env::var(NO_PAUSE_ENV_VAR) {
            Ok(v) if !v.is_empty() => parse_bool(&v).unwrap_or_else(|| {
                warn!(
                    "Invalid {} value '{}', expected true/false; ignoring",
                    NO_PAUSE_ENV_VAR, v
                );
                false
            }),
            _ => false,
        };

        Self { git_bin, no_pause }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
