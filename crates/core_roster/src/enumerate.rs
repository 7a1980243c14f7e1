use tracing::debug;

use crate::directory::SlackDirectory;
use crate::error::{Result, RosterError};
use crate::model::MemberId;

/// Page size requested from `conversations.members`.
pub const MEMBERS_PAGE_LIMIT: usize = 200;

/// Walks the paginated member listing of one channel.
pub struct MemberEnumerator<'a, D: ?Sized> {
    directory: &'a D,
}

impl<'a, D> MemberEnumerator<'a, D>
where
    D: SlackDirectory + ?Sized,
{
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    /// Returns every member id in server order. Any page failure aborts the
    /// whole walk; nothing collected so far is returned.
    pub async fn enumerate(&self, channel: &str) -> Result<Vec<MemberId>> {
        let channel = channel.trim();
        if channel.is_empty() {
            return Err(RosterError::validation("channel id is required"));
        }

        let mut all_members = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .directory
                .list_members(channel, cursor.as_deref())
                .await?;
            pages += 1;
            debug!(
                "channel={} page={} members={}",
                channel,
                pages,
                page.members.len()
            );

            all_members.extend(page.members);
            cursor = page.next_cursor.filter(|c| !c.is_empty());

            if cursor.is_none() {
                break;
            }
        }

        debug!(
            "enumerated {} members of {} in {} pages",
            all_members.len(),
            channel,
            pages
        );
        Ok(all_members)
    }
}
