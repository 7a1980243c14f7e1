use anyhow::Result;
use async_trait::async_trait;
use clap::Subcommand;
use core_roster::{MemberEnumerator, ReconcileOptions};
use roster_store::MappingStore;

use crate::app::AppContext;
use crate::commands::CliCommand;
use crate::slack::SlackClient;
use crate::support::print::print_sync_summary;
use crate::sync::sync_channel;

#[derive(Subcommand, Debug, Clone)]
pub enum MembersCommand {
    /// Refresh the stored mappings from the channel's current members
    Sync {
        /// Channel id. Defaults to SLACK_CHANNEL_ID
        #[arg(long)]
        channel: Option<String>,
        /// Keep stored members who are no longer in the channel
        #[arg(long)]
        retain_departed: bool,
        /// Number of users.info lookups in flight at once
        #[arg(long, value_parser = parse_concurrency)]
        concurrency: Option<usize>,
    },
    /// Print the raw member ids of a channel without touching the store
    List {
        #[arg(long)]
        channel: Option<String>,
    },
}

#[async_trait]
impl CliCommand for MembersCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let cfg = ctx.config()?;
        let client = SlackClient::from_config(cfg)?;

        match self {
            MembersCommand::Sync {
                channel,
                retain_departed,
                concurrency,
            } => {
                let channel = cfg.resolve_channel(channel.as_deref())?;
                let options = ReconcileOptions {
                    retain_departed: *retain_departed || cfg.retain_departed,
                    lookup_concurrency: concurrency.unwrap_or(cfg.lookup_concurrency),
                };
                let store = MappingStore::new(&cfg.mappings_file);
                let result = sync_channel(&client, &store, &channel, options).await?;
                print_sync_summary(&channel, &result);
                Ok(())
            }
            MembersCommand::List { channel } => {
                let channel = cfg.resolve_channel(channel.as_deref())?;
                let members = MemberEnumerator::new(&client).enumerate(&channel).await?;
                for member in &members {
                    println!("{member}");
                }
                Ok(())
            }
        }
    }
}

fn parse_concurrency(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(err) => Err(err.to_string()),
    }
}
