use async_trait::async_trait;

use crate::error::Result;
use crate::model::{DirectMessageReceipt, MemberId, MemberPage, Profile};

/// Remote member directory. Implemented over HTTP by the CLI's Slack client
/// and by in-memory fakes in tests.
#[async_trait]
pub trait SlackDirectory: Send + Sync {
    /// Fetch one page of a channel's members, starting at `cursor`.
    async fn list_members(&self, channel: &str, cursor: Option<&str>) -> Result<MemberPage>;

    async fn get_profile(&self, id: &MemberId) -> Result<Profile>;

    async fn send_direct_message(&self, id: &MemberId, text: &str)
        -> Result<DirectMessageReceipt>;
}
