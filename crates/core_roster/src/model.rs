use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const ADDED_ON_FORMAT: &str = "%Y-%m-%d";

/// Slack's own identifier for an account (e.g. `U024BE7LH`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Attributes resolved for one member during a single reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Profile {
    pub handle: String,
    pub real_name: String,
    pub is_bot: bool,
    pub is_deleted: bool,
}

impl Profile {
    pub fn slack_tag(&self) -> String {
        format!("@{}", self.handle)
    }
}

/// One page of `conversations.members`.
#[derive(Debug, Clone, Default)]
pub struct MemberPage {
    pub members: Vec<MemberId>,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectMessageReceipt {
    pub ok: bool,
    pub ts: Option<String>,
    pub channel: Option<String>,
}

/// Persisted record tying a member to their name and tag.
///
/// `added_on` is written once, the first time the member is seen, and carried
/// through every later pass untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMapping {
    pub user_id: MemberId,
    pub real_name: String,
    pub slack_tag: String,
    pub added_on: String,
}

impl UserMapping {
    pub fn first_name(&self) -> &str {
        self.real_name
            .split_whitespace()
            .next()
            .unwrap_or(self.real_name.as_str())
    }
}

pub fn format_added_on(date: NaiveDate) -> String {
    date.format(ADDED_ON_FORMAT).to_string()
}

/// Ordered, identifier-unique collection of mappings. Persisted as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingSet {
    mappings: Vec<UserMapping>,
}

impl MappingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserMapping> {
        self.mappings.iter()
    }

    pub fn get(&self, id: &MemberId) -> Option<&UserMapping> {
        self.mappings.iter().find(|mapping| &mapping.user_id == id)
    }

    pub fn contains(&self, id: &MemberId) -> bool {
        self.get(id).is_some()
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&UserMapping> {
        let wanted = if tag.starts_with('@') {
            tag.to_string()
        } else {
            format!("@{tag}")
        };
        self.mappings
            .iter()
            .find(|mapping| mapping.slack_tag.eq_ignore_ascii_case(&wanted))
    }

    /// Appends `mapping` unless its identifier is already present.
    pub fn insert(&mut self, mapping: UserMapping) -> bool {
        if self.contains(&mapping.user_id) {
            return false;
        }
        self.mappings.push(mapping);
        true
    }

    pub fn remove(&mut self, id: &MemberId) -> Option<UserMapping> {
        let idx = self.mappings.iter().position(|m| &m.user_id == id)?;
        Some(self.mappings.remove(idx))
    }

    pub fn into_vec(self) -> Vec<UserMapping> {
        self.mappings
    }
}

impl FromIterator<UserMapping> for MappingSet {
    fn from_iter<I: IntoIterator<Item = UserMapping>>(iter: I) -> Self {
        let mut set = MappingSet::new();
        for mapping in iter {
            set.insert(mapping);
        }
        set
    }
}

impl IntoIterator for MappingSet {
    type Item = UserMapping;
    type IntoIter = std::vec::IntoIter<UserMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.mappings.into_iter()
    }
}

impl<'a> IntoIterator for &'a MappingSet {
    type Item = &'a UserMapping;
    type IntoIter = std::slice::Iter<'a, UserMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.mappings.iter()
    }
}
