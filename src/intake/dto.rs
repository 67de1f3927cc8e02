use serde::{Deserialize, Serialize};

use crate::entries::dto::EntryResponse;

#[derive(Debug, Deserialize)]
pub struct DailyIntakeParams {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_days() -> u32 {
    7
}

#[derive(Debug, Serialize)]
pub struct DailyIntakeResponse {
    pub date: String,
    pub total_calories: f64,
    pub target_calories: f64,
    pub entries: Vec<EntryResponse>,
    pub remaining_calories: f64,
}

#[derive(Debug, Serialize)]
pub struct HistoryDay {
    pub date: String,
    pub total_calories: f64,
    pub target_calories: f64,
    pub entry_count: u64,
    pub percentage_of_target: f64,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryDay>,
    pub target_calories: f64,
    pub period_days: u32,
}
