use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    error::AppError,
    message::{ChatReply, ChatRequest},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    // An unconfigured relay answers 503 even to malformed bodies.
    state.relay.ensure_available()?;
    let Json(request) = payload?;

    let reply = state.relay.handle_chat(request).await?;
    Ok(Json(reply))
}
