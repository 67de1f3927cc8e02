use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    analysis::normalize,
    entries::repo::{self, CalorieEntry},
    error::ApiError,
    state::AppState,
};

pub const MEAL_TYPES: [&str; 4] = ["breakfast", "lunch", "dinner", "snack"];

/// A reclassification target must be one of the four named meal types;
/// "unspecified" is a creation default, not a valid target.
pub fn validate_meal_type(value: &str) -> Result<(), ApiError> {
    if MEAL_TYPES.contains(&value) {
        Ok(())
    } else {
        Err(ApiError::InvalidMealType(value.to_string()))
    }
}

/// Run a food photo through the analyzer and persist the resulting entry.
///
/// The analyzer outcome is normalized before anything else so that a
/// provider failure degrades to the fallback record instead of an error;
/// image archival is likewise best-effort. Only the final insert can fail.
pub async fn analyze_and_record(
    state: &AppState,
    user_id: &str,
    image_base64: &str,
) -> Result<CalorieEntry, ApiError> {
    let outcome = state.analyzer.analyze(image_base64).await;
    let normalized = normalize(outcome);

    let entry_id = Uuid::new_v4();
    let image_key = archive_image(state, user_id, entry_id, image_base64).await;

    let entry = repo::insert(
        &state.db,
        entry_id,
        user_id,
        &normalized.food_name,
        normalized.calories,
        image_key.as_deref(),
        normalized.confidence,
        &normalized.detail,
        OffsetDateTime::now_utc(),
    )
    .await
    .map_err(ApiError::Internal)?;

    info!(
        entry_id = %entry.id,
        user_id = %entry.user_id,
        calories = entry.calories,
        confidence = entry.confidence,
        "food entry recorded"
    );
    Ok(entry)
}

/// Store the submitted image in object storage, returning the key. A bad
/// payload or storage outage leaves the entry without an image reference
/// rather than failing the submission.
async fn archive_image(
    state: &AppState,
    user_id: &str,
    entry_id: Uuid,
    image_base64: &str,
) -> Option<String> {
    let bytes = match BASE64.decode(image_base64) {
        Ok(b) => Bytes::from(b),
        Err(e) => {
            warn!(error = %e, %entry_id, "image payload is not valid base64, skipping archival");
            return None;
        }
    };

    let key = format!("entries/{}/{}.jpg", user_id, entry_id);
    match state.storage.put_object(&key, bytes, "image/jpeg").await {
        Ok(()) => Some(key),
        Err(e) => {
            warn!(error = %e, %key, "image archival failed, entry kept without image");
            None
        }
    }
}

pub async fn reclassify(state: &AppState, id: Uuid, meal_type: &str) -> Result<(), ApiError> {
    validate_meal_type(meal_type)?;
    let updated = repo::set_meal_type(&state.db, id, meal_type)
        .await
        .map_err(ApiError::Internal)?;
    if !updated {
        return Err(ApiError::EntryNotFound);
    }
    Ok(())
}

pub async fn delete_entry(state: &AppState, id: Uuid) -> Result<(), ApiError> {
    let entry = repo::get(&state.db, id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::EntryNotFound)?;

    let deleted = repo::delete(&state.db, id)
        .await
        .map_err(ApiError::Internal)?;
    if !deleted {
        return Err(ApiError::EntryNotFound);
    }

    if let Some(key) = entry.image_key {
        if let Err(e) = state.storage.delete_object(&key).await {
            warn!(error = %e, %key, "orphaned image object left in storage");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_four_meal_types() {
        for meal in MEAL_TYPES {
            assert!(validate_meal_type(meal).is_ok());
        }
    }

    #[test]
    fn rejects_unspecified_and_arbitrary_values() {
        for bad in ["unspecified", "brunch", "BREAKFAST", "", "dessert"] {
            assert!(
                matches!(validate_meal_type(bad), Err(ApiError::InvalidMealType(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn analyzer_failure_still_produces_fallback_record() {
        // Exercise the absorption boundary without a database: the fake
        // analyzer errors, yet normalization yields a usable record.
        let state = AppState::fake_with_failing_analyzer();
        let outcome = state.analyzer.analyze("aGVsbG8=").await;
        let normalized = normalize(outcome);
        assert_eq!(normalized.food_name, "Unknown food");
        assert_eq!(normalized.calories, 200.0);
        assert_eq!(normalized.confidence, 0.2);
    }

    #[tokio::test]
    async fn archive_image_tolerates_bad_base64() {
        let state = AppState::fake();
        let key = archive_image(&state, "u1", Uuid::new_v4(), "!!not-base64!!").await;
        assert!(key.is_none());
    }

    #[tokio::test]
    async fn archive_image_builds_user_scoped_key() {
        let state = AppState::fake();
        let entry_id = Uuid::new_v4();
        let key = archive_image(&state, "u1", entry_id, "aGVsbG8=").await;
        assert_eq!(key, Some(format!("entries/u1/{}.jpg", entry_id)));
    }
}
