use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

/// Handler error. The body mirrors Slack's `{ ok: false, error }` envelope so
/// browser clients handle proxy and Slack failures the same way.
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn bad_request(error: impl Into<anyhow::Error>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: error.into(),
        }
    }

    pub fn bad_gateway(error: impl Into<anyhow::Error>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            error: error.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        warn!("proxy error ({}): {:#}", self.status, self.error);
        let body = json!({
            "ok": false,
            "error": format!("{:#}", self.error),
        });
        (self.status, Json(body)).into_response()
    }
}
