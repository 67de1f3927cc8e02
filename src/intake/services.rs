use std::collections::BTreeMap;

use time::{macros::format_description, Date, Duration, OffsetDateTime, UtcOffset};

use crate::{
    entries::repo::{self as entries_repo, CalorieEntry},
    error::ApiError,
    intake::dto::{DailyIntakeResponse, HistoryDay, HistoryResponse},
    profile::repo as profile_repo,
    state::AppState,
};

/// Used when a profile predates target computation or stored a degenerate
/// value; keeps remaining-budget and percentage math well-defined.
pub const DEFAULT_DAILY_TARGET: f64 = 2000.0;

/// Total consumed, remaining budget and the ordered entry list for one UTC
/// calendar day.
pub async fn daily_intake(
    state: &AppState,
    user_id: &str,
    date: Option<String>,
) -> Result<DailyIntakeResponse, ApiError> {
    let profile = profile_repo::find_by_user(&state.db, user_id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::ProfileNotFound)?;

    let target_date = match date {
        Some(raw) => parse_target_date(&raw)?,
        None => OffsetDateTime::now_utc().date(),
    };

    let (start, end) = day_window(target_date);
    let entries = entries_repo::list_in_window(&state.db, user_id, start, end)
        .await
        .map_err(ApiError::Internal)?;

    let total_calories: f64 = entries.iter().map(|e| e.calories).sum();
    let target_calories = effective_target(profile.daily_calorie_target);

    Ok(DailyIntakeResponse {
        date: target_date.to_string(),
        total_calories,
        target_calories,
        remaining_calories: remaining(target_calories, total_calories),
        entries: entries.into_iter().map(Into::into).collect(),
    })
}

/// Per-day totals over a trailing window of `days` days: today plus the
/// previous `days − 1` full days, ending at the current instant rather than
/// end-of-today. Days without entries produce no row.
pub async fn history(
    state: &AppState,
    user_id: &str,
    days: u32,
) -> Result<HistoryResponse, ApiError> {
    let profile = profile_repo::find_by_user(&state.db, user_id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::ProfileNotFound)?;

    let days = days.max(1);
    let now = OffsetDateTime::now_utc();
    let start = (now - Duration::days(i64::from(days) - 1))
        .date()
        .midnight()
        .assume_utc();

    let entries = entries_repo::list_in_window(&state.db, user_id, start, now)
        .await
        .map_err(ApiError::Internal)?;

    let target_calories = effective_target(profile.daily_calorie_target);
    let history = group_by_day(&entries)
        .into_iter()
        .map(|(date, day)| HistoryDay {
            date: date.to_string(),
            total_calories: day.total,
            target_calories,
            entry_count: day.count,
            percentage_of_target: day.total / target_calories * 100.0,
        })
        .collect();

    Ok(HistoryResponse {
        history,
        target_calories,
        period_days: days,
    })
}

pub fn parse_target_date(raw: &str) -> Result<Date, ApiError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(raw, &format).map_err(|_| ApiError::InvalidDateFormat(raw.to_string()))
}

/// Inclusive UTC bounds of a calendar day.
fn day_window(date: Date) -> (OffsetDateTime, OffsetDateTime) {
    let start = date.midnight().assume_utc();
    let end = start + Duration::days(1) - Duration::nanoseconds(1);
    (start, end)
}

fn effective_target(stored: Option<f64>) -> f64 {
    stored
        .filter(|t| t.is_finite() && *t > 0.0)
        .unwrap_or(DEFAULT_DAILY_TARGET)
}

fn remaining(target: f64, total: f64) -> f64 {
    (target - total).max(0.0)
}

#[derive(Debug, Default)]
struct DayTotal {
    total: f64,
    count: u64,
}

/// Fold time-ordered entries into per-UTC-date accumulators. BTreeMap keeps
/// the dates ascending; absent days simply never get a key.
fn group_by_day(entries: &[CalorieEntry]) -> BTreeMap<Date, DayTotal> {
    let mut days: BTreeMap<Date, DayTotal> = BTreeMap::new();
    for entry in entries {
        let date = entry.created_at.to_offset(UtcOffset::UTC).date();
        let day = days.entry(date).or_default();
        day.total += entry.calories;
        day.count += 1;
    }
    days
}
