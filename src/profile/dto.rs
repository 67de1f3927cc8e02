use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::profile::repo::Profile;

#[derive(Debug, Deserialize)]
pub struct SaveProfileRequest {
    pub user_id: String,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: String,
    pub goal_weight_kg: f64,
}

#[derive(Debug, Serialize)]
pub struct SaveProfileResponse {
    pub user_id: String,
    pub daily_calorie_target: f64,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: String,
    pub goal_weight_kg: f64,
    pub daily_calorie_target: Option<f64>,
    pub created_at: OffsetDateTime,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            user_id: p.user_id,
            name: p.name,
            age: p.age,
            gender: p.gender,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            activity_level: p.activity_level,
            goal_weight_kg: p.goal_weight_kg,
            daily_calorie_target: p.daily_calorie_target,
            created_at: p.created_at,
        }
    }
}
