use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

pub const SLACK_API_BASE: &str = "https://slack.com/api/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct ProxyState {
    pub(crate) http: reqwest::Client,
    pub(crate) upstream_base: Arc<String>,
    pub(crate) slack_token: Arc<String>,
}

impl ProxyState {
    pub fn new(
        upstream_base: &str,
        slack_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build upstream HTTP client")?;
        Ok(Self {
            http,
            upstream_base: Arc::new(normalize_base(upstream_base)),
            slack_token: Arc::new(slack_token.into()),
        })
    }

    pub(crate) fn upstream_url(&self, method: &str, query: Option<&str>) -> String {
        match query.filter(|q| !q.is_empty()) {
            Some(query) => format!("{}{}?{}", self.upstream_base, method, query),
            None => format!("{}{}", self.upstream_base, method),
        }
    }
}

pub struct ProxySettings {
    pub bind: SocketAddr,
    pub upstream_base: String,
    pub slack_token: String,
    pub timeout: Duration,
}

impl ProxySettings {
    pub fn new(bind: SocketAddr, slack_token: impl Into<String>) -> Self {
        Self {
            bind,
            upstream_base: SLACK_API_BASE.to_string(),
            slack_token: slack_token.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

fn normalize_base(base: &str) -> String {
    let trimmed = base.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}
