//! PostgreSQL 身体档案仓储实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fittrack_common::UserId;
use fittrack_errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::debug;

use super::{db_error, from_db_count, to_db_count};
use crate::domain::entities::BioProfile;
use crate::domain::repositories::BioProfileRepository;
use crate::domain::value_objects::BioMetrics;

pub struct PostgresBioProfileRepository {
    pool: PgPool,
}

impl PostgresBioProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BioProfileRow {
    user_id: String,
    sex: String,
    age_years: i32,
    height_cm: f64,
    weight_kg: f64,
    activity_level: String,
    goal: String,
    daily_calorie_goal: i32,
    daily_step_goal: i32,
    daily_water_goal_glasses: i32,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BioProfileRow> for BioProfile {
    type Error = AppError;

    fn try_from(row: BioProfileRow) -> Result<Self, Self::Error> {
        let metrics = BioMetrics {
            sex: row.sex.parse()?,
            age_years: from_db_count(row.age_years),
            height_cm: row.height_cm,
            weight_kg: row.weight_kg,
            activity_level: row.activity_level.parse()?,
            goal: row.goal.parse()?,
        };

        Ok(BioProfile {
            user_id: UserId::new(row.user_id),
            metrics,
            daily_calorie_goal: from_db_count(row.daily_calorie_goal),
            daily_step_goal: from_db_count(row.daily_step_goal),
            daily_water_goal_glasses: from_db_count(row.daily_water_goal_glasses),
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl BioProfileRepository for PostgresBioProfileRepository {
    async fn find_by_user(&self, user_id: &UserId) -> AppResult<Option<BioProfile>> {
        let row = sqlx::query_as::<_, BioProfileRow>(
            r#"
            SELECT user_id::text AS user_id, sex, age_years, height_cm, weight_kg,
                   activity_level, goal, daily_calorie_goal, daily_step_goal,
                   daily_water_goal_glasses, updated_at
            FROM bio_profiles
            WHERE user_id = $1::uuid
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find bio profile"))?;

        row.map(BioProfile::try_from).transpose()
    }

    async fn upsert(&self, profile: &BioProfile) -> AppResult<()> {
        let m = &profile.metrics;
        sqlx::query(
            r#"
            INSERT INTO bio_profiles (
                user_id, sex, age_years, height_cm, weight_kg, activity_level, goal,
                daily_calorie_goal, daily_step_goal, daily_water_goal_glasses, updated_at
            )
            VALUES ($1::uuid, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (user_id) DO UPDATE SET
                sex = EXCLUDED.sex,
                age_years = EXCLUDED.age_years,
                height_cm = EXCLUDED.height_cm,
                weight_kg = EXCLUDED.weight_kg,
                activity_level = EXCLUDED.activity_level,
                goal = EXCLUDED.goal,
                daily_calorie_goal = EXCLUDED.daily_calorie_goal,
                daily_step_goal = EXCLUDED.daily_step_goal,
                daily_water_goal_glasses = EXCLUDED.daily_water_goal_glasses,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(profile.user_id.as_str())
        .bind(m.sex.as_str())
        .bind(to_db_count(m.age_years, "age_years")?)
        .bind(m.height_cm)
        .bind(m.weight_kg)
        .bind(m.activity_level.as_str())
        .bind(m.goal.as_str())
        .bind(to_db_count(profile.daily_calorie_goal, "daily_calorie_goal")?)
        .bind(to_db_count(profile.daily_step_goal, "daily_step_goal")?)
        .bind(to_db_count(profile.daily_water_goal_glasses, "daily_water_goal_glasses")?)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("upsert bio profile"))?;

        debug!(user_id = %profile.user_id, "Bio profile upserted");
        Ok(())
    }
}
