use std::net::SocketAddr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Args;
use slack_proxy::{run_proxy_server, ProxySettings};

use crate::app::AppContext;
use crate::commands::CliCommand;

#[derive(Args, Debug, Clone, Default)]
#[command(about = "Run the local Slack API proxy")]
pub struct ServeCommand {
    /// Address to listen on. Defaults to ROSTER_PROXY_BIND
    #[arg(long)]
    bind: Option<String>,
}

#[async_trait]
impl CliCommand for ServeCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let cfg = ctx.config()?;
        let raw_bind = self.bind.as_deref().unwrap_or(&cfg.proxy_bind);
        let bind: SocketAddr = raw_bind
            .parse()
            .with_context(|| format!("invalid bind address `{raw_bind}`"))?;

        let mut settings = ProxySettings::new(bind, cfg.require_token()?);
        // A proxy pointed at itself would loop.
        if cfg.targets_slack_directly() {
            settings.upstream_base = cfg.api_base.clone();
        }
        settings.timeout = cfg.http_timeout;
        run_proxy_server(settings).await
    }
}
