use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{ArgGroup, Subcommand};
use roster_store::MappingStore;

use crate::app::AppContext;
use crate::commands::CliCommand;
use crate::messaging::{render_all, resolve_recipients, send_all, CampaignFile, MessageTemplate};
use crate::slack::SlackClient;
use crate::support::io::prompt_yes;
use crate::support::print::{print_delivery_report, print_preview};

#[derive(Subcommand, Debug, Clone)]
pub enum MessageCommand {
    /// Send a templated direct message to stored members
    #[command(group(ArgGroup::new("source").required(true).args(["text", "file"])))]
    Send {
        /// Template text, e.g. "Hi {first_name}!"
        #[arg(long)]
        text: Option<String>,
        /// YAML file with `template` and optional `recipients`
        #[arg(long)]
        file: Option<PathBuf>,
        /// User id or @tag; repeatable. Defaults to everyone stored
        #[arg(long = "to")]
        to: Vec<String>,
        /// Print the rendered messages without sending
        #[arg(long)]
        dry_run: bool,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[async_trait]
impl CliCommand for MessageCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<()> {
        match self {
            MessageCommand::Send {
                text,
                file,
                to,
                dry_run,
                yes,
            } => {
                let cfg = ctx.config()?;
                let (template, mut selectors) = load_template(text.as_deref(), file.as_ref())?;
                if !to.is_empty() {
                    selectors = to.clone();
                }

                let mappings = MappingStore::new(&cfg.mappings_file).load()?;
                let recipients = resolve_recipients(&mappings, &selectors)?;
                if recipients.is_empty() {
                    println!("No recipients. Run `roster members sync` first.");
                    return Ok(());
                }
                let messages = render_all(&template, &recipients);

                if *dry_run {
                    print_preview(&messages);
                    return Ok(());
                }
                if !*yes
                    && !prompt_yes(&format!("Send {} direct messages? [y/N]: ", messages.len()))?
                {
                    println!("Cancelled.");
                    return Ok(());
                }

                let client = SlackClient::from_config(cfg)?;
                let report = send_all(&client, &messages).await;
                print_delivery_report(&report);
                if report.failed() > 0 {
                    anyhow::bail!("{} of {} messages failed", report.failed(), messages.len());
                }
                Ok(())
            }
        }
    }
}

/// The template plus any recipients listed in the message file.
fn load_template(
    text: Option<&str>,
    file: Option<&PathBuf>,
) -> Result<(MessageTemplate, Vec<String>)> {
    match (text, file) {
        (Some(text), _) => Ok((MessageTemplate::parse(text)?, Vec::new())),
        (None, Some(path)) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let campaign = CampaignFile::parse(&raw)?;
            Ok((MessageTemplate::parse(&campaign.template)?, campaign.recipients))
        }
        (None, None) => anyhow::bail!("pass --text or --file"),
    }
}
