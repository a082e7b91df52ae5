use anyhow::Result;
use axum::Json;

use crate::api::dto::ApiResponse;
use crate::errors::AppError;

/// Wrap a domain result in the API envelope; errors pick their status in `AppError::from`.
pub fn to_json<T: serde::Serialize>(
    result: Result<T>
) -> Result<Json<ApiResponse<T>>, AppError> {
    match result {
        Ok(value) => Ok(Json(ApiResponse::ok(value))),
        Err(err) => Err(AppError::from(err)),
    }
}
