use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entries::repo::CalorieEntry;

#[derive(Debug, Deserialize)]
pub struct AnalyzeFoodRequest {
    pub user_id: String,
    pub image_base64: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzedFoodResponse {
    pub entry_id: Uuid,
    pub food_name: String,
    pub calories: f64,
    pub confidence: f64,
    pub analysis_details: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct SetMealTypeRequest {
    pub meal_type: String,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub entry_id: Uuid,
    pub user_id: String,
    pub food_name: String,
    pub calories: f64,
    pub meal_type: String,
    pub image_key: Option<String>,
    pub confidence: f64,
    pub analysis_details: serde_json::Value,
    pub timestamp: OffsetDateTime,
}

impl From<CalorieEntry> for EntryResponse {
    fn from(e: CalorieEntry) -> Self {
        Self {
            entry_id: e.id,
            user_id: e.user_id,
            food_name: e.food_name,
            calories: e.calories,
            meal_type: e.meal_type,
            image_key: e.image_key,
            confidence: e.confidence,
            analysis_details: e.analysis,
            timestamp: e.created_at,
        }
    }
}
