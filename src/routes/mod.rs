// src/routes/mod.rs
pub mod chat;
pub mod status;

use std::any::Any;

use crate::cors::OriginPolicy;
use crate::error::AppError;
use crate::state::SharedState;
use axum::{
    Router,
    http::{Method, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chat::chat_handler;
use status::{health_handler, root_handler};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

/// The full application: routes, state, and the CORS policy.
pub fn app(state: SharedState, origins: OriginPolicy) -> Router {
    create_router().with_state(state).layer(origins.into_layer())
}

async fn not_found(method: Method, uri: Uri) -> AppError {
    AppError::NotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    AppError::InternalUnexpected(detail).into_response()
}
