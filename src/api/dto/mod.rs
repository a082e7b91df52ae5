//! API DTOs shared by the controllers

pub mod graph_dto;

use serde::Serialize;
use serde_with::skip_serializing_none;

/// Envelope around every successful API answer; failures use `AppError`'s body.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub is_successful: bool,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            is_successful: true,
            data: Some(data),
        }
    }
}
