use crate::retry::RetryPolicy;
use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    /// Only the OMDb client needs a key; local favorites, history and theme work without one.
    pub api_key: Option<String>,
    pub base_url: String,
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("OMDB_API_KEY");
        let base_url = get("OMDB_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let data_dir = match get("CINESEARCH_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .map(|d| d.join("cinesearch"))
                .ok_or_else(|| anyhow!("No data directory available; set CINESEARCH_DATA_DIR"))?,
        };

        let defaults = RetryPolicy::default();
        let timeout_secs: u64 = parse_or(&get, "CINESEARCH_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let max_retries = parse_or(&get, "CINESEARCH_MAX_RETRIES", defaults.max_retries)?;
        let base_delay_ms = parse_or(&get, "CINESEARCH_RETRY_BASE_MS", defaults.base_delay_ms)?;

        Ok(Self {
            api_key,
            base_url,
            data_dir,
            request_timeout: Duration::from_secs(timeout_secs),
            retry: RetryPolicy {
                max_retries,
                base_delay_ms,
                max_delay_ms: defaults.max_delay_ms.max(base_delay_ms),
            },
        })
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .context("OMDB_API_KEY not set; searching and fetching details need an OMDb key")
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid value for {}: '{}' ({})", key, v, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn api_key_is_only_required_on_demand() {
        let cfg = Config::from_lookup(lookup(&[("CINESEARCH_DATA_DIR", "/tmp/x")])).unwrap();
        assert_eq!(cfg.api_key, None);
        let err = cfg.require_api_key().unwrap_err();
        assert!(err.to_string().contains("OMDB_API_KEY"));

        let blank = Config::from_lookup(lookup(&[
            ("OMDB_API_KEY", "  "),
            ("CINESEARCH_DATA_DIR", "/tmp/x"),
        ]))
        .unwrap();
        assert!(blank.require_api_key().is_err());
    }

    #[test]
    fn applies_defaults() {
        let cfg = Config::from_lookup(lookup(&[
            ("OMDB_API_KEY", "k"),
            ("CINESEARCH_DATA_DIR", "/tmp/cinesearch-test"),
        ]))
        .unwrap();
        assert_eq!(cfg.require_api_key().unwrap(), "k");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
        assert_eq!(cfg.retry, RetryPolicy::default());
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/cinesearch-test"));
    }

    #[test]
    fn reads_overrides_and_rejects_garbage() {
        let cfg = Config::from_lookup(lookup(&[
            ("OMDB_API_KEY", "k"),
            ("CINESEARCH_DATA_DIR", "/tmp/x"),
            ("CINESEARCH_TIMEOUT_SECS", "3"),
            ("CINESEARCH_MAX_RETRIES", "0"),
        ]))
        .unwrap();
        assert_eq!(cfg.request_timeout, Duration::from_secs(3));
        assert_eq!(cfg.retry.max_retries, 0);

        let err = Config::from_lookup(lookup(&[
            ("OMDB_API_KEY", "k"),
            ("CINESEARCH_DATA_DIR", "/tmp/x"),
            ("CINESEARCH_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("CINESEARCH_TIMEOUT_SECS"));
    }
}
