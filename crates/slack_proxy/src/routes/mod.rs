use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::state::ProxyState;

mod forward;

pub fn build_api_router() -> Router<ProxyState> {
    Router::new().route(
        "/:method",
        get(forward::forward_slack_method).post(forward::forward_slack_method),
    )
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
