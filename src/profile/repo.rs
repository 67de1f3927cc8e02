use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
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

pub async fn find_by_user(db: &PgPool, user_id: &str) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT user_id, name, age, gender, height_cm, weight_kg,
               activity_level, goal_weight_kg, daily_calorie_target, created_at
        FROM profiles
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(profile)
}

/// Full-replacement upsert. The whole row including `created_at` is
/// overwritten so a save always reflects exactly the submitted biometrics
/// and the target derived from them.
#[allow(clippy::too_many_arguments)]
pub async fn upsert(
    db: &PgPool,
    user_id: &str,
    name: &str,
    age: i32,
    gender: &str,
    height_cm: f64,
    weight_kg: f64,
    activity_level: &str,
    goal_weight_kg: f64,
    daily_calorie_target: f64,
) -> anyhow::Result<Profile> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (user_id, name, age, gender, height_cm, weight_kg,
                              activity_level, goal_weight_kg, daily_calorie_target, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now())
        ON CONFLICT (user_id) DO UPDATE SET
            name = EXCLUDED.name,
            age = EXCLUDED.age,
            gender = EXCLUDED.gender,
            height_cm = EXCLUDED.height_cm,
            weight_kg = EXCLUDED.weight_kg,
            activity_level = EXCLUDED.activity_level,
            goal_weight_kg = EXCLUDED.goal_weight_kg,
            daily_calorie_target = EXCLUDED.daily_calorie_target,
            created_at = EXCLUDED.created_at
        RETURNING user_id, name, age, gender, height_cm, weight_kg,
                  activity_level, goal_weight_kg, daily_calorie_target, created_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(age)
    .bind(gender)
    .bind(height_cm)
    .bind(weight_kg)
    .bind(activity_level)
    .bind(goal_weight_kg)
    .bind(daily_calorie_target)
    .fetch_one(db)
    .await?;
    Ok(profile)
}
