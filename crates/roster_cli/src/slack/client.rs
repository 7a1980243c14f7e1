use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::Config;

pub struct SlackClient {
    pub(super) http: reqwest::Client,
    pub(super) api_base: String,
    pub(super) token: Option<String>,
}

impl SlackClient {
    pub fn new(api_base: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Slack HTTP client")?;
        let api_base = if api_base.ends_with('/') {
            api_base.to_string()
        } else {
            format!("{api_base}/")
        };
        Ok(Self {
            http,
            api_base,
            token,
        })
    }

    /// Builds a client from configuration. Talking to Slack itself needs a
    /// token; a proxy injects its own, so the token is optional there.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let token = if cfg.targets_slack_directly() {
            Some(cfg.require_token()?.to_string())
        } else {
            cfg.slack_token.clone()
        };
        Self::new(&cfg.api_base, token, cfg.http_timeout)
    }

    pub(super) fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base, endpoint)
    }
}
