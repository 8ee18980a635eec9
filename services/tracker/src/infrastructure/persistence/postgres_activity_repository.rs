//! PostgreSQL 饮水/步数仓储实现

use async_trait::async_trait;
use chrono::NaiveDate;
use fittrack_common::UserId;
use fittrack_errors::AppResult;
use sqlx::PgPool;

use super::{db_error, from_db_count, to_db_count};
use crate::domain::entities::{StepLog, WaterLog};
use crate::domain::repositories::ActivityRepository;

pub struct PostgresActivityRepository {
    pool: PgPool,
}

impl PostgresActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn water(user_id: &UserId, date: NaiveDate, glasses: i32) -> WaterLog {
        WaterLog {
            user_id: user_id.clone(),
            logged_date: date,
            glasses: from_db_count(glasses),
        }
    }

    fn steps(user_id: &UserId, date: NaiveDate, steps: i32) -> StepLog {
        StepLog {
            user_id: user_id.clone(),
            logged_date: date,
            steps: from_db_count(steps),
        }
    }
}

#[async_trait]
impl ActivityRepository for PostgresActivityRepository {
    async fn find_water(&self, user_id: &UserId, date: NaiveDate) -> AppResult<Option<WaterLog>> {
        let glasses: Option<i32> = sqlx::query_scalar(
            "SELECT glasses FROM water_logs WHERE user_id = $1::uuid AND logged_date = $2",
        )
        .bind(user_id.as_str())
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find water log"))?;

        Ok(glasses.map(|glasses| Self::water(user_id, date, glasses)))
    }

    async fn increment_water(&self, user_id: &UserId, date: NaiveDate) -> AppResult<WaterLog> {
        let glasses: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO water_logs (user_id, logged_date, glasses)
            VALUES ($1::uuid, $2, 1)
            ON CONFLICT (user_id, logged_date)
            DO UPDATE SET glasses = water_logs.glasses + 1
            RETURNING glasses
            "#,
        )
        .bind(user_id.as_str())
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("increment water log"))?;

        Ok(Self::water(user_id, date, glasses))
    }

    async fn decrement_water(&self, user_id: &UserId, date: NaiveDate) -> AppResult<WaterLog> {
        let glasses: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO water_logs (user_id, logged_date, glasses)
            VALUES ($1::uuid, $2, 0)
            ON CONFLICT (user_id, logged_date)
            DO UPDATE SET glasses = GREATEST(water_logs.glasses - 1, 0)
            RETURNING glasses
            "#,
        )
        .bind(user_id.as_str())
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("decrement water log"))?;

        Ok(Self::water(user_id, date, glasses))
    }

    async fn find_steps(&self, user_id: &UserId, date: NaiveDate) -> AppResult<Option<StepLog>> {
        let steps: Option<i32> = sqlx::query_scalar(
            "SELECT steps FROM step_logs WHERE user_id = $1::uuid AND logged_date = $2",
        )
        .bind(user_id.as_str())
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find step log"))?;

        Ok(steps.map(|steps| Self::steps(user_id, date, steps)))
    }

    async fn record_steps_max(
        &self,
        user_id: &UserId,
        date: NaiveDate,
        steps: u32,
    ) -> AppResult<StepLog> {
        let reported = to_db_count(steps, "steps")?;
        let steps: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO step_logs (user_id, logged_date, steps)
            VALUES ($1::uuid, $2, $3)
            ON CONFLICT (user_id, logged_date)
            DO UPDATE SET steps = GREATEST(step_logs.steps, EXCLUDED.steps)
            RETURNING steps
            "#,
        )
        .bind(user_id.as_str())
        .bind(date)
        .bind(reported)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("record step log"))?;

        Ok(Self::steps(user_id, date, steps))
    }
}
