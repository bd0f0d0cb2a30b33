use axum::{Json, extract::State};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::state::SharedState;

pub const SERVER_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub api_key_configured: bool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub server: &'static str,
    pub timestamp: String,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub async fn root_handler(State(state): State<SharedState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        status: "running",
        timestamp: now(),
        api_key_configured: state.relay.is_available(),
    })
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        server: SERVER_NAME,
        timestamp: now(),
    })
}
