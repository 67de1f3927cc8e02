use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entries::{
        dto::{AnalyzeFoodRequest, AnalyzedFoodResponse, EntryResponse, SetMealTypeRequest},
        repo, services,
    },
    error::ApiError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analyze-food", post(analyze_food))
        .route("/entries/:id", get(get_entry).delete(delete_entry))
        .route("/entries/:id/meal-type", put(set_meal_type))
        .route("/entries/:id/image", get(entry_image))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

#[instrument(skip(state, payload))]
pub async fn analyze_food(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeFoodRequest>,
) -> Result<(StatusCode, Json<AnalyzedFoodResponse>), (StatusCode, String)> {
    let entry =
        services::analyze_and_record(&state, &payload.user_id, &payload.image_base64).await?;

    Ok((
        StatusCode::CREATED,
        Json(AnalyzedFoodResponse {
            entry_id: entry.id,
            food_name: entry.food_name,
            calories: entry.calories,
            confidence: entry.confidence,
            analysis_details: entry.analysis,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EntryResponse>, (StatusCode, String)> {
    let entry = repo::get(&state.db, id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::EntryNotFound)?;
    Ok(Json(entry.into()))
}

/// 302 to a presigned URL for the entry's archived image.
#[instrument(skip(state))]
pub async fn entry_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, (StatusCode, String)> {
    let entry = repo::get(&state.db, id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::EntryNotFound)?;

    let key = entry
        .image_key
        .ok_or((StatusCode::NOT_FOUND, "Entry has no stored image".to_string()))?;

    let url = state
        .storage
        .presign_get(&key, 600)
        .await
        .map_err(ApiError::Internal)?;
    Ok(Redirect::temporary(&url))
}

#[instrument(skip(state, payload))]
pub async fn set_meal_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetMealTypeRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    services::reclassify(&state, id, &payload.meal_type).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    services::delete_entry(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
