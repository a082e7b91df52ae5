use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::domain::perf::error::PerfGraphError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Body parsing error: {0}")]
    BodyParsingError(String),

    #[error("Treeherder API error: {0}")]
    UpstreamError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Helper for mapping any unknown error into internal error
pub fn internal_error<E: ToString>(err: E) -> AppError {
    AppError::InternalServerError(err.to_string())
}

impl From<anyhow::Error> for AppError {
    /// Pick the status from the root cause; the message keeps the whole chain.
    fn from(err: anyhow::Error) -> Self {
        let message = format!("{:#}", err);

        if err.downcast_ref::<validator::ValidationErrors>().is_some() {
            return AppError::BodyParsingError(message);
        }
        if err.downcast_ref::<reqwest::Error>().is_some() {
            return AppError::UpstreamError(message);
        }

        match err.downcast_ref::<PerfGraphError>() {
            Some(PerfGraphError::SessionNotFound(_)) => AppError::NotFound(message),
            Some(PerfGraphError::MixedPolarity { .. }) | Some(PerfGraphError::UnknownOption(_)) => {
                AppError::BodyParsingError(message)
            }
            Some(PerfGraphError::Upstream { .. }) => AppError::UpstreamError(message),
            None => internal_error(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Choose status codes per variant
        let status = match self {
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BodyParsingError(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // String provided by thiserror → safe JSON message
        let body = Json(json!({
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}
