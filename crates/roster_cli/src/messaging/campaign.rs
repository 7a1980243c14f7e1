use std::collections::HashSet;

use core_roster::{MappingSet, MemberId, Result, RosterError, UserMapping};
use serde::Deserialize;

use super::template::MessageTemplate;

/// YAML message file:
///
/// ```yaml
/// template: |
///   Hi {first_name}, welcome to the channel!
/// recipients:
///   - U024BE7LH
///   - "@alice"
/// ```
#[derive(Debug, Deserialize)]
pub struct CampaignFile {
    pub template: String,
    #[serde(default)]
    pub recipients: Vec<String>,
}

impl CampaignFile {
    pub fn parse(input: &str) -> Result<Self> {
        serde_yaml::from_str(input)
            .map_err(|err| RosterError::validation(format!("invalid message file: {err}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub user_id: MemberId,
    pub slack_tag: String,
    pub text: String,
}

/// Resolves ids or `@tags` against the stored mappings, in the given order.
/// No selectors means everyone in the set.
pub fn resolve_recipients(mappings: &MappingSet, selectors: &[String]) -> Result<Vec<UserMapping>> {
    if selectors.is_empty() {
        return Ok(mappings.iter().cloned().collect());
    }

    let mut seen = HashSet::new();
    let mut recipients = Vec::with_capacity(selectors.len());
    let mut unknown = Vec::new();

    for selector in selectors {
        let selector = selector.trim();
        let found = mappings
            .get(&MemberId::from(selector))
            .or_else(|| mappings.find_by_tag(selector));
        match found {
            Some(mapping) => {
                if seen.insert(mapping.user_id.clone()) {
                    recipients.push(mapping.clone());
                }
            }
            None => unknown.push(selector.to_string()),
        }
    }

    if !unknown.is_empty() {
        return Err(RosterError::validation(format!(
            "unknown recipients (run `roster members sync` first?): {}",
            unknown.join(", ")
        )));
    }
    Ok(recipients)
}

pub fn render_all(template: &MessageTemplate, recipients: &[UserMapping]) -> Vec<RenderedMessage> {
    recipients
        .iter()
        .map(|mapping| RenderedMessage {
            user_id: mapping.user_id.clone(),
            slack_tag: mapping.slack_tag.clone(),
            text: template.render(mapping),
        })
        .collect()
}
