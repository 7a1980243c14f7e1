use core_roster::Reconciliation;

use crate::messaging::{Delivery, DeliveryReport, RenderedMessage};

pub fn print_sync_summary(channel: &str, result: &Reconciliation) {
    println!("{}", sync_summary_line(channel, result));
    for skipped in &result.skipped {
        println!("  skipped {}: {}", skipped.user_id, skipped.reason.describe());
    }
    let failures = result.lookup_failures().count();
    if failures > 0 {
        println!("{failures} lookups failed; rerun sync to pick those members up.");
    }
}

/// Departed members kept by `--retain-departed` are counted apart from the
/// members resolved in this pass.
fn sync_summary_line(channel: &str, result: &Reconciliation) -> String {
    format!(
        "Synced {} members from {} ({} skipped, {} departed kept)",
        result.mappings.len() - result.retained,
        channel,
        result.skipped.len(),
        result.retained
    )
}

pub fn print_preview(messages: &[RenderedMessage]) {
    for message in messages {
        println!("--- {} ({})", message.slack_tag, message.user_id);
        println!("{}", message.text.trim_end());
    }
    println!("{} messages would be sent.", messages.len());
}

pub fn print_delivery_report(report: &DeliveryReport) {
    for outcome in &report.outcomes {
        match &outcome.delivery {
            Delivery::Sent { .. } => println!("  ✓ {}", outcome.slack_tag),
            Delivery::Failed(reason) => println!("  ✗ {}: {}", outcome.slack_tag, reason),
        }
    }
    println!("Sent {}, failed {}", report.sent(), report.failed());
}
