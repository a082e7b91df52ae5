//! Graph routes (e.g., /api/v1/graphs/*)

use axum::{routing::{get, post}, Router};

use crate::api::controller::graph::PerfGraphController;
use crate::app_state::AppState;

/// Build the router for graph endpoints under /api/v1/graphs
pub fn graph_routes() -> Router<AppState> {
    Router::new()
        .route("/render", post(PerfGraphController::render))
        .route(
            "/",
            get(PerfGraphController::list_sessions).post(PerfGraphController::create_session),
        )
        .route(
            "/{id}",
            get(PerfGraphController::get_session).delete(PerfGraphController::delete_session),
        )
        .route("/{id}/reload", post(PerfGraphController::reload_session))
        .route("/{id}/click", post(PerfGraphController::click))
        .route("/{id}/hover", post(PerfGraphController::hover))
}
