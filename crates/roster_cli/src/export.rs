use anyhow::{Context, Result};
use clap::ValueEnum;
use core_roster::MappingSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// One `@tag (Real Name)` line per member
    Text,
    Csv,
    Json,
}

const CSV_HEADER: &str = "userId,realName,slackTag,addedOn";

pub fn render(mappings: &MappingSet, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Text => Ok(render_text(mappings)),
        ExportFormat::Csv => Ok(render_csv(mappings)),
        ExportFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(mappings).context("Failed to serialize mappings")?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn render_text(mappings: &MappingSet) -> String {
    mappings
        .iter()
        .map(|m| format!("{} ({})\n", m.slack_tag, m.real_name))
        .collect()
}

fn render_csv(mappings: &MappingSet) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for m in mappings {
        let row = [
            m.user_id.as_str(),
            m.real_name.as_str(),
            m.slack_tag.as_str(),
            m.added_on.as_str(),
        ]
        .map(csv_field)
        .join(",");
        out.push_str(&row);
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Column-aligned listing for the terminal.
pub fn render_table(mappings: &MappingSet) -> String {
    let headers = ["USER ID", "NAME", "TAG", "ADDED ON"];
    let rows: Vec<[&str; 4]> = mappings
        .iter()
        .map(|m| {
            [
                m.user_id.as_str(),
                m.real_name.as_str(),
                m.slack_tag.as_str(),
                m.added_on.as_str(),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 4]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(headers);
    for row in rows {
        out.push_str(&line(row));
    }
    out
}
