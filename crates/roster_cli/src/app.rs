use anyhow::Result;
use clap::Parser;
use core_roster::RosterError;
use once_cell::sync::OnceCell;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use crate::commands::Cli;
use crate::config;

#[derive(Default)]
pub struct AppContext {
    config: OnceCell<config::Config>,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            config: OnceCell::new(),
        }
    }

    pub fn config(&self) -> Result<&config::Config> {
        self.config.get_or_try_init(config::load_config)
    }
}

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();
    let ctx = AppContext::new();
    cli.execute(&ctx).await.map_err(with_connection_hint)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

fn with_connection_hint(err: anyhow::Error) -> anyhow::Error {
    let unreachable = err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<RosterError>(),
            Some(RosterError::Transport { .. })
        )
    });
    if unreachable {
        err.context(
            "could not reach the Slack API; if SLACK_API_BASE points at a proxy, is `roster serve` running?",
        )
    } else {
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failures_gain_a_hint() {
        let err = anyhow::Error::new(RosterError::transport("users.info", "connection refused"));
        let hinted = with_connection_hint(err);
        assert!(hinted.to_string().contains("roster serve"));

        let plain = anyhow::Error::new(RosterError::validation("no channel given"));
        assert!(!with_connection_hint(plain).to_string().contains("roster serve"));
    }
}
