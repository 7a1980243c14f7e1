use serde::{Deserialize, Serialize};

pub const CONVERSATIONS_MEMBERS: &str = "conversations.members";
pub const CONVERSATIONS_OPEN: &str = "conversations.open";
pub const USERS_INFO: &str = "users.info";
pub const CHAT_POST_MESSAGE: &str = "chat.postMessage";

#[derive(Debug, Deserialize)]
pub struct ResponseMetadata {
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ConversationsMembersResponse {
    pub ok: bool,
    pub members: Option<Vec<String>>,
    pub response_metadata: Option<ResponseMetadata>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SlackUserProfile {
    pub real_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SlackUser {
    pub name: Option<String>,
    pub real_name: Option<String>,
    pub deleted: Option<bool>,
    pub is_bot: Option<bool>,
    pub profile: Option<SlackUserProfile>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UsersInfoResponse {
    pub ok: bool,
    pub user: Option<SlackUser>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct OpenConversationRequest<'a> {
    pub users: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct OpenedChannel {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ConversationsOpenResponse {
    pub ok: bool,
    pub channel: Option<OpenedChannel>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct PostMessageRequest<'a> {
    pub channel: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct PostMessageResponse {
    pub ok: bool,
    pub ts: Option<String>,
    pub channel: Option<String>,
    pub error: Option<String>,
}
