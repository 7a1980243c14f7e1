pub mod mappings;
pub mod members;
pub mod message;
pub mod serve;
pub mod setup;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Parser, Subcommand};

use crate::app::AppContext;

pub use mappings::MappingsCommand;
pub use members::MembersCommand;
pub use message::MessageCommand;
pub use serve::ServeCommand;
pub use setup::SetupCommand;

#[async_trait]
pub trait CliCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<()>;
}

#[derive(Parser, Debug, Clone)]
#[command(name = "roster", version, about = "Keep a Slack channel's member roster in sync")]
pub struct Cli {
    #[command(subcommand)]
    pub command: RootCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RootCommand {
    Setup(SetupCommand),
    Serve(ServeCommand),
    #[command(subcommand)]
    Members(MembersCommand),
    #[command(subcommand)]
    Mappings(MappingsCommand),
    #[command(subcommand)]
    Message(MessageCommand),
}

impl Cli {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        match self.command {
            RootCommand::Setup(cmd) => cmd.execute(ctx).await,
            RootCommand::Serve(cmd) => cmd.execute(ctx).await,
            RootCommand::Members(cmd) => cmd.execute(ctx).await,
            RootCommand::Mappings(cmd) => cmd.execute(ctx).await,
            RootCommand::Message(cmd) => cmd.execute(ctx).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_sync_flags() {
        let cli = Cli::try_parse_from([
            "roster",
            "members",
            "sync",
            "--channel",
            "C1",
            "--retain-departed",
            "--concurrency",
            "4",
        ])
        .unwrap();
        match cli.command {
            RootCommand::Members(MembersCommand::Sync {
                channel,
                retain_departed,
                concurrency,
            }) => {
                assert_eq!(channel.as_deref(), Some("C1"));
                assert!(retain_departed);
                assert_eq!(concurrency, Some(4));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn message_send_needs_exactly_one_source() {
        assert!(Cli::try_parse_from(["roster", "message", "send"]).is_err());
        assert!(Cli::try_parse_from([
            "roster", "message", "send", "--text", "hi", "--file", "m.yaml"
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "roster", "message", "send", "--text", "hi", "--to", "@a", "--to", "U2"
        ])
        .is_ok());
    }
}
