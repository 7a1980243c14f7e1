use std::io::{self, Write};

use anyhow::{Context, Result};

pub fn prompt_yes(prompt: &str) -> Result<bool> {
    let decision = prompt_line(prompt)?.to_ascii_lowercase();
    Ok(matches!(decision.as_str(), "y" | "yes"))
}

pub fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut buffer = String::new();
    io::stdin()
        .read_line(&mut buffer)
        .context("Failed to read response")?;
    Ok(buffer.trim().to_string())
}
