//! Runtime configuration parsed from environment variables.
//!
//! Every setting has a default so a bare `logros` invocation talks to a
//! local API on port 4000 and keeps its credentials under `.logros/`.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:4000";
pub const DEFAULT_DATA_DIR: &str = ".logros";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_COOKIE_DAYS: i64 = 7;
pub const MAX_COOKIE_DAYS: i64 = 3650;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PROTECTED_PREFIXES: &[&str] = &["/home", "/registros"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    pub port: u16,
    pub cookie_days: i64,
    pub timeouts: ApiTimeouts,
    pub protected_prefixes: Vec<String>,
}

impl Config {
    /// Build typed config from environment variables (and `.env`, if present).
    ///
    /// Optional:
    /// - `LOGROS_API_URL`: default `http://localhost:4000`
    /// - `LOGROS_DATA_DIR`: default `.logros`
    /// - `LOGROS_STATIC_DIR`: default `static`
    /// - `PORT`: default 3000
    /// - `LOGROS_COOKIE_DAYS`: default 7, between 1 and 3650
    /// - `LOGROS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `LOGROS_CONNECT_TIMEOUT_SECS`: default 10
    /// - `LOGROS_PROTECTED_PREFIXES`: comma list, default `/home,/registros`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` when a numeric setting does not parse or
    /// the cookie lifetime is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_url = std::env::var("LOGROS_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let data_dir = PathBuf::from(std::env::var("LOGROS_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_owned()));
        let static_dir =
            PathBuf::from(std::env::var("LOGROS_STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_owned()));

        let port = env_parse("PORT", DEFAULT_PORT)?;
        let cookie_days = check_cookie_days(env_parse("LOGROS_COOKIE_DAYS", DEFAULT_COOKIE_DAYS)?)?;
        let timeouts = ApiTimeouts {
            request_secs: env_parse("LOGROS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse("LOGROS_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let protected_prefixes = parse_prefixes(std::env::var("LOGROS_PROTECTED_PREFIXES").ok().as_deref());

        Ok(Self { api_url, data_dir, static_dir, port, cookie_days, timeouts, protected_prefixes })
    }
}

/// Parse `key` as `T`, falling back to `default` when unset or blank.
fn env_parse<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid { key, value: raw })
        }
        _ => Ok(default),
    }
}

fn check_cookie_days(days: i64) -> Result<i64, ConfigError> {
    if (1..=MAX_COOKIE_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(ConfigError::Invalid { key: "LOGROS_COOKIE_DAYS", value: days.to_string() })
    }
}

/// Split a comma list of path prefixes, normalizing each to start with `/`.
fn parse_prefixes(raw: Option<&str>) -> Vec<String> {
    let parsed: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| if s.starts_with('/') { s.to_owned() } else { format!("/{s}") })
        .collect();

    if parsed.is_empty() {
        DEFAULT_PROTECTED_PREFIXES.iter().map(|s| (*s).to_owned()).collect()
    } else {
        parsed
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
