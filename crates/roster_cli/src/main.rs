use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    roster_cli::app::run().await
}
