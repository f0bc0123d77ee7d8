use anyhow::{anyhow, Result};
use std::net::SocketAddr;
use std::str::FromStr;
use url::Url;

use crate::app::notifications::DEFAULT_NOTICE_CAPACITY;
use crate::app::sources::DEFAULT_CACHE_KEY;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub http_addr: String,
    /// Job list endpoint; without it the store starts from the local cache.
    pub remote_jobs_url: Option<Url>,
    pub remote_timeout_seconds: u64,
    /// Without it snapshots live in process memory only.
    pub redis_url: Option<String>,
    pub cache_key: String,
    pub notice_capacity: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let http_addr = env_or("HTTP_ADDR", "0.0.0.0:8080");
        let _parsed_http_addr = SocketAddr::from_str(&http_addr)
            .map_err(|err| anyhow!("invalid HTTP_ADDR: {}", err))?;

        Ok(Self {
            http_addr,
            remote_jobs_url: env_opt_parse("REMOTE_JOBS_URL")?,
            remote_timeout_seconds: env_or_parse("REMOTE_TIMEOUT_SECONDS", "10")?,
            redis_url: env_opt("REDIS_URL"),
            cache_key: env_or("CACHE_KEY", DEFAULT_CACHE_KEY),
            notice_capacity: env_or_parse(
                "NOTICE_CAPACITY",
                &DEFAULT_NOTICE_CAPACITY.to_string(),
            )?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Unset and blank are both treated as absent.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn env_or_parse<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    value
        .parse::<T>()
        .map_err(|err| anyhow!("invalid {}: {}", key, err))
}

fn env_opt_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|err| anyhow!("invalid {}: {}", key, err))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns its variable names so they can run in parallel.

    #[test]
    fn parse_falls_back_to_default() {
        let value: u64 = env_or_parse("GIGBOARD_TEST_UNSET_TIMEOUT", "10").unwrap();
        assert_eq!(value, 10);
    }

    #[test]
    fn parse_reports_the_offending_key() {
        std::env::set_var("GIGBOARD_TEST_BAD_CAPACITY", "lots");
        let err = env_or_parse::<usize>("GIGBOARD_TEST_BAD_CAPACITY", "50").unwrap_err();
        assert!(err.to_string().contains("GIGBOARD_TEST_BAD_CAPACITY"));
    }

    #[test]
    fn blank_optional_url_is_absent() {
        std::env::set_var("GIGBOARD_TEST_BLANK_URL", "  ");
        let url: Option<Url> = env_opt_parse("GIGBOARD_TEST_BLANK_URL").unwrap();
        assert!(url.is_none());
    }

    #[test]
    fn optional_url_is_validated() {
        std::env::set_var("GIGBOARD_TEST_BAD_URL", "not a url");
        assert!(env_opt_parse::<Url>("GIGBOARD_TEST_BAD_URL").is_err());

        std::env::set_var("GIGBOARD_TEST_GOOD_URL", "https://api.example.com/jobs");
        let url: Option<Url> = env_opt_parse("GIGBOARD_TEST_GOOD_URL").unwrap();
        assert_eq!(url.unwrap().path(), "/jobs");
    }
}
