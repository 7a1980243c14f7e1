use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use core_roster::RosterError;

const SLACK_TOKEN_VAR: &str = "SLACK_TOKEN";
const CHANNEL_ID_VAR: &str = "SLACK_CHANNEL_ID";
const API_BASE_VAR: &str = "SLACK_API_BASE";
const MAPPINGS_FILE_VAR: &str = "ROSTER_MAPPINGS_FILE";
const PROXY_BIND_VAR: &str = "ROSTER_PROXY_BIND";
const HTTP_TIMEOUT_VAR: &str = "ROSTER_HTTP_TIMEOUT_SECS";
const LOOKUP_CONCURRENCY_VAR: &str = "ROSTER_LOOKUP_CONCURRENCY";
const RETAIN_DEPARTED_VAR: &str = "ROSTER_RETAIN_DEPARTED";

pub const DEFAULT_API_BASE: &str = "https://slack.com/api/";
const DEFAULT_MAPPINGS_FILE: &str = "./user_mappings.json";
const DEFAULT_PROXY_BIND: &str = "127.0.0.1:3001";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOOKUP_CONCURRENCY: usize = 1;

#[derive(Debug, Clone)]
pub struct Config {
    pub slack_token: Option<String>,
    pub channel_id: Option<String>,
    pub api_base: String,
    pub mappings_file: PathBuf,
    pub proxy_bind: String,
    pub http_timeout: Duration,
    pub lookup_concurrency: usize,
    pub retain_departed: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_config()
    }

    /// True when requests go straight to Slack rather than through a proxy.
    pub fn targets_slack_directly(&self) -> bool {
        self.api_base
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .starts_with("slack.com")
    }

    pub fn require_token(&self) -> core_roster::Result<&str> {
        self.slack_token.as_deref().ok_or_else(|| {
            RosterError::validation(
                "SLACK_TOKEN not found. Run 'roster setup' or export SLACK_TOKEN.",
            )
        })
    }

    /// Picks the channel from the command line, falling back to SLACK_CHANNEL_ID.
    pub fn resolve_channel(&self, from_cli: Option<&str>) -> core_roster::Result<String> {
        from_cli
            .or(self.channel_id.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                RosterError::validation(
                    "no channel given. Pass --channel or set SLACK_CHANNEL_ID.",
                )
            })
    }
}

pub fn load_config() -> Result<Config> {
    dotenvy::dotenv().ok();
    config_from(|key| env::var(key).ok())
}

pub(crate) fn config_from<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| {
        lookup(key).and_then(|raw| {
            let trimmed = raw.trim().to_owned();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        })
    };

    let http_timeout_secs = match non_empty(HTTP_TIMEOUT_VAR) {
        Some(raw) => raw.parse::<u64>().with_context(|| {
            format!("{HTTP_TIMEOUT_VAR} `{raw}` is not a whole number of seconds")
        })?,
        None => DEFAULT_HTTP_TIMEOUT_SECS,
    };

    let lookup_concurrency = match non_empty(LOOKUP_CONCURRENCY_VAR) {
        Some(raw) => raw.parse::<usize>().with_context(|| {
            format!("{LOOKUP_CONCURRENCY_VAR} `{raw}` is not a positive number")
        })?,
        None => DEFAULT_LOOKUP_CONCURRENCY,
    };
    if lookup_concurrency == 0 {
        anyhow::bail!("{LOOKUP_CONCURRENCY_VAR} must be at least 1");
    }

    let retain_departed = match non_empty(RETAIN_DEPARTED_VAR) {
        Some(raw) => parse_flag(&raw)
            .with_context(|| format!("{RETAIN_DEPARTED_VAR} `{raw}` is not true/false"))?,
        None => false,
    };

    Ok(Config {
        slack_token: non_empty(SLACK_TOKEN_VAR),
        channel_id: non_empty(CHANNEL_ID_VAR),
        api_base: non_empty(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        mappings_file: non_empty(MAPPINGS_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MAPPINGS_FILE)),
        proxy_bind: non_empty(PROXY_BIND_VAR).unwrap_or_else(|| DEFAULT_PROXY_BIND.to_string()),
        http_timeout: Duration::from_secs(http_timeout_secs),
        lookup_concurrency,
        retain_departed,
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config_from(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.slack_token, None);
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.mappings_file, PathBuf::from("./user_mappings.json"));
        assert_eq!(cfg.proxy_bind, "127.0.0.1:3001");
        assert_eq!(cfg.http_timeout, Duration::from_secs(30));
        assert_eq!(cfg.lookup_concurrency, 1);
        assert!(!cfg.retain_departed);
        assert!(cfg.targets_slack_directly());
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let cfg = config(&[("SLACK_TOKEN", "   ")]).unwrap();
        assert!(matches!(
            cfg.require_token(),
            Err(RosterError::Validation(_))
        ));
    }

    #[test]
    fn proxy_base_is_not_slack() {
        let cfg = config(&[("SLACK_API_BASE", "http://localhost:3001/api/")]).unwrap();
        assert!(!cfg.targets_slack_directly());
    }

    #[test]
    fn rejects_unparseable_numbers_and_flags() {
        assert!(config(&[("ROSTER_HTTP_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config(&[("ROSTER_LOOKUP_CONCURRENCY", "0")]).is_err());
        assert!(config(&[("ROSTER_RETAIN_DEPARTED", "maybe")]).is_err());
        assert!(config(&[("ROSTER_RETAIN_DEPARTED", "Yes")]).unwrap().retain_departed);
    }

    #[test]
    fn channel_flag_wins_over_environment() {
        let cfg = config(&[("SLACK_CHANNEL_ID", "C_ENV")]).unwrap();
        assert_eq!(cfg.resolve_channel(Some("C_CLI")).unwrap(), "C_CLI");
        assert_eq!(cfg.resolve_channel(None).unwrap(), "C_ENV");

        let bare = config(&[]).unwrap();
        assert!(matches!(
            bare.resolve_channel(Some(" ")),
            Err(RosterError::Validation(_))
        ));
    }
}
