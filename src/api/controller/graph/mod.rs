use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::graph_dto::{GraphRequest, TooltipHoverRequest};
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::state::runtime::graph::graph_runtime_state::{
    GraphSession, GraphSessionSummary, TooltipState,
};
use crate::domain::perf::dto::chart_payload_dto::ChartPayload;
use crate::errors::AppError;

pub struct PerfGraphController;

impl PerfGraphController {
    /// One-shot: fetch, merge and return the payload in the response.
    pub async fn render(
        State(state): State<AppState>,
        Json(req): Json<GraphRequest>,
    ) -> Result<Json<ApiResponse<ChartPayload>>, AppError> {
        if let Err(e) = req.validate() {
            return Err(AppError::BodyParsingError(e.to_string()));
        }
        to_json(state.perf_graph_service.load(&req).await)
    }

    pub async fn create_session(
        State(state): State<AppState>,
        Json(req): Json<GraphRequest>,
    ) -> Result<(StatusCode, Json<ApiResponse<GraphSession>>), AppError> {
        let body = to_json(state.graph_session_service.create(req).await)?;
        Ok((StatusCode::ACCEPTED, body))
    }

    pub async fn list_sessions(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<Vec<GraphSessionSummary>>>, AppError> {
        to_json(state.graph_session_service.list().await)
    }

    pub async fn get_session(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
    ) -> Result<Json<ApiResponse<GraphSession>>, AppError> {
        to_json(state.graph_session_service.get(id).await)
    }

    pub async fn reload_session(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
    ) -> Result<Json<ApiResponse<GraphSession>>, AppError> {
        to_json(state.graph_session_service.reload(id).await)
    }

    pub async fn click(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
    ) -> Result<Json<ApiResponse<TooltipState>>, AppError> {
        to_json(state.graph_session_service.click(id).await)
    }

    pub async fn hover(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
        Json(req): Json<TooltipHoverRequest>,
    ) -> Result<Json<ApiResponse<TooltipState>>, AppError> {
        to_json(state.graph_session_service.hover(id, req).await)
    }

    pub async fn delete_session(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
    ) -> Result<Json<ApiResponse<GraphSessionSummary>>, AppError> {
        to_json(state.graph_session_service.remove(id).await)
    }
}
