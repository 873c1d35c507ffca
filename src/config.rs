use std::path::PathBuf;
use std::time::Duration;

use crate::error::{OnboardError, Result};

const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STATE_DIR: &str = ".onboard";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash.
    pub api_url: String,
    /// Bearer token sent with every request, if any.
    pub api_token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Directory holding the local storage file.
    pub state_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                      |
    /// |------------------------|------------------------------|
    /// | `ONBOARD_API_URL`      | `http://localhost:8000/api`  |
    /// | `ONBOARD_API_TOKEN`    | unset                        |
    /// | `ONBOARD_TIMEOUT_SECS` | `30`                         |
    /// | `ONBOARD_STATE_DIR`    | `.onboard`                   |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("ONBOARD_API_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(OnboardError::Config(format!(
                "ONBOARD_API_URL must be an http(s) URL, got '{api_url}'"
            )));
        }

        let api_token = lookup("ONBOARD_API_TOKEN")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let timeout_secs = match lookup("ONBOARD_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                OnboardError::Config(format!("ONBOARD_TIMEOUT_SECS must be a whole number, got '{raw}'"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(OnboardError::Config(
                "ONBOARD_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        let state_dir = lookup("ONBOARD_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR));

        Ok(Self {
            api_url,
            api_token,
            timeout: Duration::from_secs(timeout_secs),
            state_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_token, None);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config =
            ClientConfig::from_lookup(lookup(&[("ONBOARD_API_URL", "https://api.yatra.in/v1/")])).unwrap();
        assert_eq!(config.api_url, "https://api.yatra.in/v1");
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let err = ClientConfig::from_lookup(lookup(&[("ONBOARD_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, OnboardError::Config(_)));
        let err = ClientConfig::from_lookup(lookup(&[("ONBOARD_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, OnboardError::Config(_)));
    }

    #[test]
    fn non_http_url_is_rejected() {
        assert!(ClientConfig::from_lookup(lookup(&[("ONBOARD_API_URL", "ftp://x")])).is_err());
    }

    #[test]
    fn blank_token_is_ignored() {
        let config = ClientConfig::from_lookup(lookup(&[("ONBOARD_API_TOKEN", "  ")])).unwrap();
        assert_eq!(config.api_token, None);
    }
}
