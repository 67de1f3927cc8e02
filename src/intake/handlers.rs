use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    intake::{
        dto::{DailyIntakeParams, DailyIntakeResponse, HistoryParams, HistoryResponse},
        services,
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/daily-intake/:user_id", get(daily_intake))
        .route("/history/:user_id", get(history))
}

#[instrument(skip(state))]
pub async fn daily_intake(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<DailyIntakeParams>,
) -> Result<Json<DailyIntakeResponse>, (StatusCode, String)> {
    let response = services::daily_intake(&state, &user_id, params.date).await?;
    Ok(Json(response))
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, (StatusCode, String)> {
    let response = services::history(&state, &user_id, params.days).await?;
    Ok(Json(response))
}
