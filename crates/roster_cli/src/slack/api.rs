use async_trait::async_trait;
use core_roster::{
    DirectMessageReceipt, MemberId, MemberPage, Profile, Result, RosterError, SlackDirectory,
    MEMBERS_PAGE_LIMIT,
};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::client::SlackClient;
use super::types::{
    ConversationsMembersResponse, ConversationsOpenResponse, OpenConversationRequest,
    PostMessageRequest, PostMessageResponse, ResponseMetadata, UsersInfoResponse,
    CHAT_POST_MESSAGE, CONVERSATIONS_MEMBERS, CONVERSATIONS_OPEN, USERS_INFO,
};

#[async_trait]
impl SlackDirectory for SlackClient {
    async fn list_members(&self, channel: &str, cursor: Option<&str>) -> Result<MemberPage> {
        let limit = MEMBERS_PAGE_LIMIT.to_string();
        let mut params = vec![("channel", channel), ("limit", limit.as_str())];
        if let Some(c) = cursor {
            params.push(("cursor", c));
        }

        let resp: ConversationsMembersResponse = self
            .execute_request(
                self.authorized(self.http.get(self.api_url(CONVERSATIONS_MEMBERS)))
                    .query(&params),
                CONVERSATIONS_MEMBERS,
            )
            .await?;

        if !resp.ok {
            return Err(slack_error(CONVERSATIONS_MEMBERS, resp.error));
        }
        let members = resp.members.ok_or_else(|| {
            RosterError::upstream(CONVERSATIONS_MEMBERS, "response is missing `members`")
        })?;

        Ok(MemberPage {
            members: members.into_iter().map(MemberId).collect(),
            next_cursor: next_cursor(resp.response_metadata),
        })
    }

    async fn get_profile(&self, id: &MemberId) -> Result<Profile> {
        let resp: UsersInfoResponse = self
            .execute_request(
                self.authorized(self.http.get(self.api_url(USERS_INFO)))
                    .query(&[("user", id.as_str())]),
                USERS_INFO,
            )
            .await?;

        if !resp.ok {
            return Err(slack_error(USERS_INFO, resp.error));
        }
        let user = resp
            .user
            .ok_or_else(|| RosterError::upstream(USERS_INFO, "response is missing `user`"))?;

        let real_name = user
            .real_name
            .filter(|name| !name.trim().is_empty())
            .or_else(|| user.profile.and_then(|profile| profile.real_name))
            .unwrap_or_default();

        Ok(Profile {
            handle: user.name.unwrap_or_default(),
            real_name,
            is_bot: user.is_bot.unwrap_or(false),
            is_deleted: user.deleted.unwrap_or(false),
        })
    }

    async fn send_direct_message(&self, id: &MemberId, text: &str) -> Result<DirectMessageReceipt> {
        let opened: ConversationsOpenResponse = self
            .execute_request(
                self.authorized(self.http.post(self.api_url(CONVERSATIONS_OPEN)))
                    .json(&OpenConversationRequest { users: id.as_str() }),
                CONVERSATIONS_OPEN,
            )
            .await?;
        if !opened.ok {
            return Err(slack_error(CONVERSATIONS_OPEN, opened.error));
        }
        let channel = opened.channel.map(|c| c.id).ok_or_else(|| {
            RosterError::upstream(CONVERSATIONS_OPEN, "response is missing `channel`")
        })?;

        let posted: PostMessageResponse = self
            .execute_request(
                self.authorized(self.http.post(self.api_url(CHAT_POST_MESSAGE)))
                    .json(&PostMessageRequest {
                        channel: &channel,
                        text,
                    }),
                CHAT_POST_MESSAGE,
            )
            .await?;
        if !posted.ok {
            return Err(slack_error(CHAT_POST_MESSAGE, posted.error));
        }

        Ok(DirectMessageReceipt {
            ok: true,
            ts: posted.ts,
            channel: posted.channel.or(Some(channel)),
        })
    }
}

impl SlackClient {
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends once and decodes the JSON body. No retry: a 429 or any other
    /// non-success status is reported as an upstream failure.
    pub(super) async fn execute_request<T>(&self, builder: RequestBuilder, label: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!("calling {}", label);
        let response = builder
            .send()
            .await
            .map_err(|err| RosterError::transport(format!("failed to send {label}"), err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RosterError::upstream(
                label,
                format!("returned status: {status}"),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| RosterError::transport(format!("failed to read {label}"), err))?;
        serde_json::from_slice(&body).map_err(|err| {
            RosterError::upstream(label, format!("malformed response: {err}"))
        })
    }
}

fn slack_error(endpoint: &str, error: Option<String>) -> RosterError {
    RosterError::upstream(
        endpoint,
        format!(
            "ok=false: {}",
            error.as_deref().unwrap_or("unknown error")
        ),
    )
}

fn next_cursor(metadata: Option<ResponseMetadata>) -> Option<String> {
    metadata
        .and_then(|meta| meta.next_cursor)
        .filter(|cursor| !cursor.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::extract::{Path, Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::any;
    use axum::{Json, Router};
    use core_roster::{MappingSet, MemberEnumerator, ReconcileOptions, Reconciler};
    use serde_json::{json, Value};

    use super::*;

    #[derive(Default)]
    struct FakeSlack {
        calls: Mutex<Vec<(String, HashMap<String, String>, Option<String>)>>,
        posted: Mutex<Vec<Value>>,
    }

    async fn fake_slack(
        State(slack): State<Arc<FakeSlack>>,
        Path(method): Path<String>,
        Query(query): Query<HashMap<String, String>>,
        headers: HeaderMap,
        body: Option<Json<Value>>,
    ) -> (StatusCode, Json<Value>) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        slack
            .calls
            .lock()
            .unwrap()
            .push((method.clone(), query.clone(), auth));

        let reply = match method.as_str() {
            "conversations.members" => match (
                query.get("channel").map(String::as_str),
                query.get("cursor").map(String::as_str),
            ) {
                (Some("C_TWO_PAGES"), None) => json!({
                    "ok": true,
                    "members": ["U1", "U2"],
                    "response_metadata": { "next_cursor": "page2" }
                }),
                (Some("C_TWO_PAGES"), Some("page2")) => json!({
                    "ok": true,
                    "members": ["U3"],
                    "response_metadata": { "next_cursor": "" }
                }),
                (Some("C_NO_MEMBERS_FIELD"), _) => json!({ "ok": true }),
                (Some("C_BUSY"), _) => {
                    return (
                        StatusCode::TOO_MANY_REQUESTS,
                        Json(json!({ "ok": false, "error": "ratelimited" })),
                    )
                }
                _ => json!({ "ok": false, "error": "channel_not_found" }),
            },
            "users.info" => match query.get("user").map(String::as_str) {
                Some("U1") => json!({
                    "ok": true,
                    "user": { "id": "U1", "name": "alice", "real_name": "Alice A",
                              "deleted": false, "is_bot": false }
                }),
                Some("U2") => json!({
                    "ok": true,
                    "user": { "id": "U2", "name": "deploybot", "is_bot": true,
                              "profile": { "real_name": "Deploy Bot" } }
                }),
                Some("U3") => json!({
                    "ok": true,
                    "user": { "id": "U3", "name": "carol", "real_name": "",
                              "profile": { "real_name": "Carol C" } }
                }),
                Some("U4") => json!({
                    "ok": true,
                    "user": { "name": "dave", "real_name": "Dave D" }
                }),
                _ => json!({ "ok": false, "error": "user_not_found" }),
            },
            "conversations.open" => json!({ "ok": true, "channel": { "id": "D42" } }),
            "chat.postMessage" => {
                let body = body.map(|Json(v)| v).unwrap_or(Value::Null);
                slack.posted.lock().unwrap().push(body.clone());
                json!({ "ok": true, "ts": "1700000000.000100", "channel": body["channel"] })
            }
            _ => json!({ "ok": false, "error": "unknown_method" }),
        };
        (StatusCode::OK, Json(reply))
    }

    async fn spawn_fake_slack() -> (String, Arc<FakeSlack>) {
        let slack = Arc::new(FakeSlack::default());
        let app = Router::new()
            .route("/api/:method", any(fake_slack))
            .with_state(slack.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/api"), slack)
    }

    fn client(base: &str, token: Option<&str>) -> SlackClient {
        SlackClient::new(base, token.map(str::to_string), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn enumerates_two_pages_with_two_requests() {
        let (base, slack) = spawn_fake_slack().await;
        let client = client(&base, Some("xoxb-test"));

        let members = MemberEnumerator::new(&client)
            .enumerate("C_TWO_PAGES")
            .await
            .unwrap();

        assert_eq!(
            members,
            vec![MemberId::from("U1"), MemberId::from("U2"), MemberId::from("U3")]
        );
        let calls = slack.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1.get("limit").map(String::as_str), Some("200"));
        assert_eq!(calls[0].1.get("cursor"), None);
        assert_eq!(calls[1].1.get("cursor").map(String::as_str), Some("page2"));
        assert_eq!(calls[0].2.as_deref(), Some("Bearer xoxb-test"));
    }

    #[tokio::test]
    async fn slack_error_is_an_upstream_failure() {
        let (base, _slack) = spawn_fake_slack().await;
        let err = MemberEnumerator::new(&client(&base, None))
            .enumerate("C_MISSING")
            .await
            .unwrap_err();

        match err {
            RosterError::Upstream { endpoint, message } => {
                assert_eq!(endpoint, "conversations.members");
                assert!(message.contains("channel_not_found"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_members_field_is_an_upstream_failure() {
        let (base, _slack) = spawn_fake_slack().await;
        let err = client(&base, None)
            .list_members("C_NO_MEMBERS_FIELD", None)
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::Upstream { .. }));
    }

    #[tokio::test]
    async fn rate_limit_is_reported_not_retried() {
        let (base, slack) = spawn_fake_slack().await;
        let err = client(&base, None)
            .list_members("C_BUSY", None)
            .await
            .unwrap_err();

        assert!(matches!(err, RosterError::Upstream { .. }));
        assert_eq!(slack.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unreachable_api_is_a_transport_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}/api/"), None)
            .list_members("C1", None)
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::Transport { .. }));
    }

    #[tokio::test]
    async fn profile_falls_back_to_nested_real_name() {
        let (base, _slack) = spawn_fake_slack().await;
        let client = client(&base, None);

        let carol = client.get_profile(&MemberId::from("U3")).await.unwrap();
        assert_eq!(carol.handle, "carol");
        assert_eq!(carol.real_name, "Carol C");

        let bot = client.get_profile(&MemberId::from("U2")).await.unwrap();
        assert!(bot.is_bot);
    }

    #[tokio::test]
    async fn profile_without_user_id_field_still_resolves() {
        let (base, _slack) = spawn_fake_slack().await;
        let dave = client(&base, None)
            .get_profile(&MemberId::from("U4"))
            .await
            .unwrap();

        assert_eq!(dave.handle, "dave");
        assert_eq!(dave.real_name, "Dave D");
        assert!(!dave.is_bot);
        assert!(!dave.is_deleted);
    }

    #[tokio::test]
    async fn sync_over_http_maps_humans_only() {
        let (base, _slack) = spawn_fake_slack().await;
        let client = client(&base, None);

        let members = MemberEnumerator::new(&client)
            .enumerate("C_TWO_PAGES")
            .await
            .unwrap();
        let result = Reconciler::new(&client, ReconcileOptions::default())
            .reconcile(&members, &MappingSet::new())
            .await
            .unwrap();

        let tags: Vec<_> = result.mappings.iter().map(|m| m.slack_tag.as_str()).collect();
        assert_eq!(tags, vec!["@alice", "@carol"]);
    }

    #[tokio::test]
    async fn direct_message_opens_then_posts() {
        let (base, slack) = spawn_fake_slack().await;
        let client = client(&base, Some("xoxb-test"));

        let receipt = client
            .send_direct_message(&MemberId::from("U1"), "hello Alice")
            .await
            .unwrap();

        assert!(receipt.ok);
        assert_eq!(receipt.ts.as_deref(), Some("1700000000.000100"));
        assert_eq!(receipt.channel.as_deref(), Some("D42"));
        let posted = slack.posted.lock().unwrap();
        assert_eq!(posted[0]["channel"], "D42");
        assert_eq!(posted[0]["text"], "hello Alice");
        let methods: Vec<_> = slack
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|(m, _, _)| m.clone())
            .collect();
        assert_eq!(methods, vec!["conversations.open", "chat.postMessage"]);
    }
}
