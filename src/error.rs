// src/error.rs
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::providers::ProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Message is required")]
    MissingInput,

    #[error("Message must be a string")]
    InvalidInputType,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Chat service is not configured")]
    ServiceUnavailable,

    #[error("Provider quota exhausted: {0}")]
    UpstreamRateLimited(String),

    #[error("Provider rejected credential: {0}")]
    UpstreamAuthFailed(String),

    #[error("Provider failure: {0}")]
    UpstreamGenericFailure(String),

    #[error("No route for {method} {path}")]
    NotFound { method: String, path: String },

    #[error("Method {method} is not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },

    #[error("Internal server error: {0}")]
    InternalUnexpected(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingInput | AppError::InvalidInputType | AppError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::UpstreamRateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::UpstreamAuthFailed(_) => StatusCode::UNAUTHORIZED,
            AppError::UpstreamGenericFailure(_) | AppError::InternalUnexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Machine-readable code placed in the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingInput => "missing_message",
            AppError::InvalidInputType => "invalid_message_type",
            AppError::InvalidBody(_) => "invalid_body",
            AppError::ServiceUnavailable => "service_unavailable",
            AppError::UpstreamRateLimited(_) => "rate_limited",
            AppError::UpstreamAuthFailed(_) => "authentication_failed",
            AppError::UpstreamGenericFailure(_) => "upstream_error",
            AppError::NotFound { .. } => "not_found",
            AppError::MethodNotAllowed { .. } => "method_not_allowed",
            AppError::InternalUnexpected(_) => "internal_error",
        }
    }

    // Provider details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::ServiceUnavailable => {
                "The chat service is not configured. Please try again later.".to_string()
            }
            AppError::UpstreamRateLimited(_) => {
                "The assistant is receiving too many requests. Please try again later.".to_string()
            }
            AppError::UpstreamAuthFailed(_) => {
                "The assistant could not authenticate with its provider.".to_string()
            }
            AppError::UpstreamGenericFailure(_) => {
                "Something went wrong with the OpenAI API".to_string()
            }
            AppError::InternalUnexpected(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.code(),
            message: self.public_message(),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured => AppError::ServiceUnavailable,
            ProviderError::QuotaExceeded(msg) => AppError::UpstreamRateLimited(msg),
            ProviderError::InvalidCredential(msg) => AppError::UpstreamAuthFailed(msg),
            other => AppError::UpstreamGenericFailure(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "request failed");
        } else {
            tracing::warn!(code = self.code(), error = %self, "request rejected");
        }

        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_map_onto_taxonomy() {
        let quota: AppError = ProviderError::QuotaExceeded("insufficient_quota".into()).into();
        assert_eq!(quota.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(quota.code(), "rate_limited");

        let auth: AppError = ProviderError::InvalidCredential("bad key".into()).into();
        assert_eq!(auth.status(), StatusCode::UNAUTHORIZED);

        let timeout: AppError = ProviderError::Timeout.into();
        assert_eq!(timeout.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(timeout.code(), "upstream_error");

        let missing: AppError = ProviderError::NotConfigured.into();
        assert_eq!(missing.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn upstream_detail_is_not_exposed() {
        let err = AppError::UpstreamGenericFailure("HTTP 502: secret backend detail".into());
        let body = err.body();
        assert_eq!(body.error, "upstream_error");
        assert!(!body.message.contains("secret"));
    }
}
