//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_DB_PATH, DEFAULT_MAX_PASTE_SIZE, DEFAULT_PORT, DEFAULT_RATE_LIMIT_MAX,
    DEFAULT_RATE_LIMIT_WINDOW_SECS,
};
use crate::dedup::DedupMode;
use serde::Deserialize;
use std::env;
use std::num::NonZeroU64;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Runtime configuration for Picopaste.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub max_paste_size: usize,
    pub rate_limit_max: u32,
    pub rate_limit_window: Duration,
    pub dedup_mode: DedupMode,
    pub trust_proxy: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            port: DEFAULT_PORT,
            max_paste_size: DEFAULT_MAX_PASTE_SIZE,
            rate_limit_max: DEFAULT_RATE_LIMIT_MAX,
            rate_limit_window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
            dedup_mode: DedupMode::default(),
            trust_proxy: false,
        }
    }
}

/// Expand a leading `~/` to the user's home directory.
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

/// Read and parse an environment value, warning and falling back on garbage.
fn env_parsed<T>(name: &str, default: T) -> T
where
    T: FromStr,
{
    match env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring invalid {}='{}'; using default", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: env::var("PICOPASTE_DB_PATH")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(expand_tilde)
                .unwrap_or(defaults.db_path),
            port: env_parsed("PICOPASTE_PORT", defaults.port),
            max_paste_size: env_parsed("PICOPASTE_MAX_PASTE_SIZE", defaults.max_paste_size),
            rate_limit_max: env_parsed("PICOPASTE_RATE_LIMIT_MAX", defaults.rate_limit_max),
            // A zero window would reset every bucket on each request.
            rate_limit_window: Duration::from_secs(
                env_parsed(
                    "PICOPASTE_RATE_LIMIT_WINDOW_SECS",
                    NonZeroU64::new(defaults.rate_limit_window.as_secs())
                        .unwrap_or(NonZeroU64::MIN),
                )
                .get(),
            ),
            dedup_mode: env_parsed("PICOPASTE_DEDUP", defaults.dedup_mode),
            trust_proxy: env_flag_enabled("PICOPASTE_TRUST_PROXY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{env_lock, EnvGuard};

    #[test]
    fn parse_env_flag_accepts_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_env_flag(value), Some(true), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_accepts_falsy_values() {
        for value in ["", "0", "false", "FALSE", " no ", "off"] {
            assert_eq!(parse_env_flag(value), Some(false), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_rejects_unknown_values() {
        assert_eq!(parse_env_flag("maybe"), None);
        assert_eq!(parse_env_flag("enabled"), None);
    }

    #[test]
    fn from_env_uses_defaults_when_unset() {
        let _lock = env_lock().lock().expect("env lock");
        let _guards = [
            EnvGuard::remove("PICOPASTE_DB_PATH"),
            EnvGuard::remove("PICOPASTE_PORT"),
            EnvGuard::remove("PICOPASTE_MAX_PASTE_SIZE"),
            EnvGuard::remove("PICOPASTE_RATE_LIMIT_MAX"),
            EnvGuard::remove("PICOPASTE_RATE_LIMIT_WINDOW_SECS"),
            EnvGuard::remove("PICOPASTE_DEDUP"),
            EnvGuard::remove("PICOPASTE_TRUST_PROXY"),
        ];

        let config = Config::from_env();
        assert_eq!(config.db_path, "/tmp/db");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_paste_size, 4 * 1024 * 1024);
        assert_eq!(config.rate_limit_max, 2);
        assert_eq!(config.rate_limit_window, Duration::from_secs(30));
        assert_eq!(config.dedup_mode, DedupMode::Scan);
        assert!(!config.trust_proxy);
    }

    #[test]
    fn from_env_reads_overrides_and_ignores_garbage() {
        let _lock = env_lock().lock().expect("env lock");
        let _guards = [
            EnvGuard::set("PICOPASTE_DB_PATH", "/var/lib/picopaste"),
            EnvGuard::set("PICOPASTE_PORT", "not-a-port"),
            EnvGuard::set("PICOPASTE_MAX_PASTE_SIZE", "1024"),
            EnvGuard::set("PICOPASTE_RATE_LIMIT_MAX", "5"),
            EnvGuard::set("PICOPASTE_RATE_LIMIT_WINDOW_SECS", "60"),
            EnvGuard::set("PICOPASTE_DEDUP", "digest"),
            EnvGuard::set("PICOPASTE_TRUST_PROXY", "yes"),
        ];

        let config = Config::from_env();
        assert_eq!(config.db_path, "/var/lib/picopaste");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_paste_size, 1024);
        assert_eq!(config.rate_limit_max, 5);
        assert_eq!(config.rate_limit_window, Duration::from_secs(60));
        assert_eq!(config.dedup_mode, DedupMode::Digest);
        assert!(config.trust_proxy);
    }

    #[test]
    fn zero_rate_limit_window_falls_back_to_default() {
        let _lock = env_lock().lock().expect("env lock");
        let _guards = [
            EnvGuard::set("PICOPASTE_RATE_LIMIT_MAX", "2"),
            EnvGuard::set("PICOPASTE_RATE_LIMIT_WINDOW_SECS", "0"),
        ];

        let config = Config::from_env();
        assert_eq!(config.rate_limit_max, 2);
        assert_eq!(config.rate_limit_window, Duration::from_secs(30));
    }

    #[test]
    fn from_env_expands_tilde_in_db_path() {
        let _lock = env_lock().lock().expect("env lock");
        let _home = EnvGuard::set("HOME", "/home/paster");
        let _db = EnvGuard::set("PICOPASTE_DB_PATH", "~/pastes");

        let config = Config::from_env();
        assert_eq!(config.db_path, "/home/paster/pastes");
    }
}
