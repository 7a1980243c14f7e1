use core_roster::{MemberId, SlackDirectory};
use tracing::{info, warn};

use super::campaign::RenderedMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent { ts: Option<String>, channel: Option<String> },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub user_id: MemberId,
    pub slack_tag: String,
    pub delivery: Delivery,
}

#[derive(Debug, Clone, Default)]
pub struct DeliveryReport {
    pub outcomes: Vec<DeliveryOutcome>,
}

impl DeliveryReport {
    pub fn sent(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.delivery, Delivery::Sent { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.sent()
    }
}

/// Sends each message in turn. A failed recipient is recorded and the rest
/// are still attempted.
pub async fn send_all<D>(directory: &D, messages: &[RenderedMessage]) -> DeliveryReport
where
    D: SlackDirectory + ?Sized,
{
    let mut report = DeliveryReport::default();

    for message in messages {
        let delivery = match directory
            .send_direct_message(&message.user_id, &message.text)
            .await
        {
            Ok(receipt) => {
                info!("sent DM to {} ({})", message.slack_tag, message.user_id);
                Delivery::Sent {
                    ts: receipt.ts,
                    channel: receipt.channel,
                }
            }
            Err(err) => {
                warn!("DM to {} failed: {}", message.slack_tag, err);
                Delivery::Failed(err.to_string())
            }
        };
        report.outcomes.push(DeliveryOutcome {
            user_id: message.user_id.clone(),
            slack_tag: message.slack_tag.clone(),
            delivery,
        });
    }

    report
}
