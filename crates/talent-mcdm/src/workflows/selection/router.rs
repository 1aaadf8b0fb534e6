use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::service::{SelectionReport, SelectionRequest, SelectionService};
use crate::error::AppError;

/// Router builder exposing the ranking pipeline and the position catalogue.
pub fn selection_router(service: Arc<SelectionService>) -> Router {
    Router::new()
        .route("/api/v1/selection/rank", post(rank_handler))
        .route("/api/v1/selection/positions", get(positions_handler))
        .with_state(service)
}

pub(crate) async fn rank_handler(
    State(service): State<Arc<SelectionService>>,
    axum::Json(request): axum::Json<SelectionRequest>,
) -> Result<axum::Json<SelectionReport>, AppError> {
    let report = service.evaluate(&request)?;
    Ok(axum::Json(report))
}

pub(crate) async fn positions_handler(State(service): State<Arc<SelectionService>>) -> Response {
    let payload = json!({
        "positions": service.positions(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
