use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::support::io::prompt_line;

const SLACK_APPS_URL: &str = "https://api.slack.com/apps";

pub fn run_setup(root: &Path) -> Result<()> {
    println!("Welcome to roster setup!");
    println!();
    println!("This stores a Slack token and a default channel in `.env`.");
    println!("`.env` is added to `.gitignore` if it's not already there.");
    println!();

    println!("=== Slack Token ===");
    println!("Opening the Slack app dashboard in your browser...");
    if let Err(err) = open::that(SLACK_APPS_URL) {
        println!("Could not open a browser ({err}); visit {SLACK_APPS_URL} manually.");
    }
    println!();
    println!("Instructions:");
    println!("  1. Create a Slack app or open an existing one");
    println!("  2. Add the channels:read, groups:read, users:read, im:write and chat:write scopes");
    println!("  3. Install it to your workspace and copy the OAuth token");
    println!();

    let token = prompt_line("Paste your Slack OAuth token (starting with xox...): ")?;
    if token.is_empty() {
        anyhow::bail!("Slack token cannot be empty");
    }
    let channel = prompt_line("Default channel id (e.g. C0123456789, blank to skip): ")?;

    write_env(root, &token, &channel)?;
    ensure_gitignored(root)?;

    println!();
    println!("✓ Setup complete!");
    println!("You can now run:");
    println!("  - `roster members sync` to refresh the member roster");
    println!("  - `roster serve` to start the local Slack proxy");
    Ok(())
}

fn write_env(root: &Path, token: &str, channel: &str) -> Result<()> {
    let mut content = format!("SLACK_TOKEN={token}\n");
    if !channel.is_empty() {
        content.push_str(&format!("SLACK_CHANNEL_ID={channel}\n"));
    }
    fs::write(root.join(".env"), content).context("Failed to write .env file")
}

fn ensure_gitignored(root: &Path) -> Result<()> {
    let path = root.join(".gitignore");
    if !path.exists() {
        return fs::write(&path, ".env\n").context("Failed to create .gitignore");
    }

    let mut content = fs::read_to_string(&path).context("Failed to read .gitignore")?;
    if content.lines().any(|line| line.trim() == ".env") {
        return Ok(());
    }
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(".env\n");
    fs::write(&path, content).context("Failed to update .gitignore")
}
