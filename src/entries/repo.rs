use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CalorieEntry {
    pub id: Uuid,
    pub user_id: String,
    pub food_name: String,
    pub calories: f64,
    pub meal_type: String,
    pub image_key: Option<String>,
    pub confidence: f64,
    pub analysis: serde_json::Value,
    pub created_at: OffsetDateTime,
}

#[allow(clippy::too_many_arguments)]
pub async fn insert(
    db: &PgPool,
    id: Uuid,
    user_id: &str,
    food_name: &str,
    calories: f64,
    image_key: Option<&str>,
    confidence: f64,
    analysis: &serde_json::Value,
    created_at: OffsetDateTime,
) -> anyhow::Result<CalorieEntry> {
    let entry = sqlx::query_as::<_, CalorieEntry>(
        r#"
        INSERT INTO calorie_entries
            (id, user_id, food_name, calories, meal_type, image_key, confidence, analysis, created_at)
        VALUES ($1, $2, $3, $4, 'unspecified', $5, $6, $7, $8)
        RETURNING id, user_id, food_name, calories, meal_type, image_key,
                  confidence, analysis, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(food_name)
    .bind(calories)
    .bind(image_key)
    .bind(confidence)
    .bind(analysis)
    .bind(created_at)
    .fetch_one(db)
    .await?;
    Ok(entry)
}

pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<CalorieEntry>> {
    let entry = sqlx::query_as::<_, CalorieEntry>(
        r#"
        SELECT id, user_id, food_name, calories, meal_type, image_key,
               confidence, analysis, created_at
        FROM calorie_entries
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(entry)
}

/// Returns false when no entry with that id exists.
pub async fn set_meal_type(db: &PgPool, id: Uuid, meal_type: &str) -> anyhow::Result<bool> {
    let result = sqlx::query(r#"UPDATE calorie_entries SET meal_type = $2 WHERE id = $1"#)
        .bind(id)
        .bind(meal_type)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns false when no entry with that id exists.
pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(r#"DELETE FROM calorie_entries WHERE id = $1"#)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// All of a user's entries whose creation instant falls in [from, to],
/// oldest first. The aggregators rely on this ordering.
pub async fn list_in_window(
    db: &PgPool,
    user_id: &str,
    from: OffsetDateTime,
    to: OffsetDateTime,
) -> anyhow::Result<Vec<CalorieEntry>> {
    let rows = sqlx::query_as::<_, CalorieEntry>(
        r#"
        SELECT id, user_id, food_name, calories, meal_type, image_key,
               confidence, analysis, created_at
        FROM calorie_entries
        WHERE user_id = $1 AND created_at >= $2 AND created_at <= $3
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
