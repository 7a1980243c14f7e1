use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use clap::Subcommand;
use core_roster::MemberId;
use roster_store::MappingStore;

use crate::app::AppContext;
use crate::commands::CliCommand;
use crate::export::{self, ExportFormat};
use crate::support::fs::write_output;

#[derive(Subcommand, Debug, Clone)]
pub enum MappingsCommand {
    /// Show the stored mappings as a table
    List,
    /// Write the stored mappings as text, CSV or JSON
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Text)]
        format: ExportFormat,
        /// Output file. Defaults to stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Drop one member from the stored mappings
    Remove { user_id: String },
}

#[async_trait]
impl CliCommand for MappingsCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let cfg = ctx.config()?;
        let store = MappingStore::new(&cfg.mappings_file);

        match self {
            MappingsCommand::List => {
                let mappings = store.load()?;
                if mappings.is_empty() {
                    println!("No mappings stored yet. Run `roster members sync`.");
                } else {
                    print!("{}", export::render_table(&mappings));
                }
                Ok(())
            }
            MappingsCommand::Export { format, output } => {
                let mappings = store.load()?;
                let rendered = export::render(&mappings, *format)?;
                write_output(output.as_deref(), &rendered)?;
                if let Some(path) = output {
                    println!("Exported {} mappings to {}", mappings.len(), path.display());
                }
                Ok(())
            }
            MappingsCommand::Remove { user_id } => {
                let id = MemberId::from(user_id.trim());
                if store.remove(&id)? {
                    println!("Removed {id}");
                } else {
                    println!("{id} is not in {}", store.path().display());
                }
                Ok(())
            }
        }
    }
}
