use anyhow::{anyhow, Context};
use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method};
use axum::response::{IntoResponse, Response};
use tracing::{debug, info};

use crate::error::AppError;
use crate::state::ProxyState;

/// Relays `/api/:method` to the Slack Web API with the server's own token.
pub async fn forward_slack_method(
    State(state): State<ProxyState>,
    Path(method): Path<String>,
    http_method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    if !is_valid_method_name(&method) {
        return Err(AppError::bad_request(anyhow!(
            "invalid Slack method name `{}`",
            method
        )));
    }

    let url = state.upstream_url(&method, query.as_deref());
    info!("forwarding {} {}", http_method, method);

    let mut request = state
        .http
        .request(http_method, &url)
        .bearer_auth(state.slack_token.as_str());
    if let Some(content_type) = headers.get(CONTENT_TYPE) {
        request = request.header(CONTENT_TYPE, content_type.clone());
    }
    if !body.is_empty() {
        request = request.body(body);
    }

    let upstream = request
        .send()
        .await
        .with_context(|| format!("failed to reach Slack for {}", method))
        .map_err(AppError::bad_gateway)?;

    let status = upstream.status();
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
    let payload = upstream
        .bytes()
        .await
        .with_context(|| format!("failed to read Slack response for {}", method))
        .map_err(AppError::bad_gateway)?;
    debug!("{} answered {} ({} bytes)", method, status, payload.len());

    let mut response = (status, payload).into_response();
    if let Some(content_type) = content_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    Ok(response)
}

/// Slack method names look like `conversations.members` or `chat.postMessage`.
pub(crate) fn is_valid_method_name(method: &str) -> bool {
    !method.is_empty()
        && !method.starts_with('.')
        && !method.contains("..")
        && method
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_slack_method_names() {
        assert!(is_valid_method_name("conversations.members"));
        assert!(is_valid_method_name("chat.postMessage"));
        assert!(is_valid_method_name("users.info"));
    }

    #[test]
    fn rejects_paths_and_traversal() {
        assert!(!is_valid_method_name(""));
        assert!(!is_valid_method_name(".."));
        assert!(!is_valid_method_name("../admin"));
        assert!(!is_valid_method_name("users.info?x=1"));
        assert!(!is_valid_method_name("users/info"));
    }
}
