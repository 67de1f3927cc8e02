use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::ApiError,
    profile::{
        dto::{ProfileResponse, SaveProfileRequest, SaveProfileResponse},
        repo,
        target::daily_calorie_target,
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", post(save_profile))
        .route("/profile/:user_id", get(get_profile))
}

#[instrument(skip(state, payload))]
pub async fn save_profile(
    State(state): State<AppState>,
    Json(payload): Json<SaveProfileRequest>,
) -> Result<Json<SaveProfileResponse>, (StatusCode, String)> {
    if let Err(e) = validate(&payload) {
        warn!(error = %e, "rejected profile payload");
        return Err(e.into());
    }

    // The target is always recomputed from the submitted biometrics, never
    // carried over from a previous write.
    let target = daily_calorie_target(
        payload.age,
        &payload.gender,
        payload.height_cm,
        payload.weight_kg,
        &payload.activity_level,
        payload.goal_weight_kg,
    );

    let profile = repo::upsert(
        &state.db,
        &payload.user_id,
        &payload.name,
        payload.age,
        &payload.gender,
        payload.height_cm,
        payload.weight_kg,
        &payload.activity_level,
        payload.goal_weight_kg,
        target,
    )
    .await
    .map_err(ApiError::Internal)?;

    info!(user_id = %profile.user_id, target, "profile saved");
    Ok(Json(SaveProfileResponse {
        user_id: profile.user_id,
        daily_calorie_target: target,
    }))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    let profile = repo::find_by_user(&state.db, &user_id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::ProfileNotFound)?;
    Ok(Json(profile.into()))
}

fn validate(p: &SaveProfileRequest) -> Result<(), ApiError> {
    if p.user_id.trim().is_empty() {
        return Err(ApiError::Validation("user_id must not be empty".into()));
    }
    if p.age <= 0 {
        return Err(ApiError::Validation("age must be positive".into()));
    }
    if p.height_cm <= 0.0 || p.weight_kg <= 0.0 || p.goal_weight_kg <= 0.0 {
        return Err(ApiError::Validation(
            "height, weight and goal weight must be positive".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> SaveProfileRequest {
        SaveProfileRequest {
            user_id: "user-1".into(),
            name: "Test".into(),
            age: 25,
            gender: "male".into(),
            height_cm: 175.0,
            weight_kg: 70.0,
            activity_level: "moderately_active".into(),
            goal_weight_kg: 65.0,
        }
    }

    #[test]
    fn accepts_valid_payload() {
        assert!(validate(&valid_request()).is_ok());
    }

    #[test]
    fn rejects_blank_user_id() {
        let mut req = valid_request();
        req.user_id = "  ".into();
        assert!(matches!(validate(&req), Err(ApiError::Validation(_))));
    }

    #[test]
    fn rejects_non_positive_biometrics() {
        let mut req = valid_request();
        req.age = 0;
        assert!(validate(&req).is_err());

        let mut req = valid_request();
        req.weight_kg = -1.0;
        assert!(validate(&req).is_err());

        let mut req = valid_request();
        req.goal_weight_kg = 0.0;
        assert!(validate(&req).is_err());
    }
}
