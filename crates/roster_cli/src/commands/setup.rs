use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Args;

use crate::app::AppContext;
use crate::commands::CliCommand;
use crate::setup;

#[derive(Args, Debug, Clone, Default)]
#[command(about = "Store a Slack token and default channel in .env")]
pub struct SetupCommand;

#[async_trait]
impl CliCommand for SetupCommand {
    async fn execute(&self, _ctx: &AppContext) -> Result<()> {
        let root = std::env::current_dir().context("Failed to resolve current directory")?;
        setup::run_setup(&root)
    }
}
