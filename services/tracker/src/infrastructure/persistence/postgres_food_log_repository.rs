//! PostgreSQL 饮食日志仓储实现
//!
//! 日志写入 `food_logs`，条目写入 `food_items`，同一事务内完成。

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use fittrack_common::UserId;
use fittrack_errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::db_error;
use crate::domain::entities::{FoodItem, FoodLog, NutritionTotals};
use crate::domain::repositories::FoodLogRepository;

const LOG_COLUMNS: &str = r#"
    id, user_id::text AS user_id, image_url, meal_type, logged_date, notes,
    total_calories, total_protein, total_carbs, total_fat, ai_confidence, created_at
"#;

pub struct PostgresFoodLogRepository {
    pool: PgPool,
}

impl PostgresFoodLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FoodLogRow {
    id: Uuid,
    user_id: String,
    image_url: Option<String>,
    meal_type: String,
    logged_date: NaiveDate,
    notes: Option<String>,
    total_calories: f64,
    total_protein: f64,
    total_carbs: f64,
    total_fat: f64,
    ai_confidence: Option<f64>,
    created_at: DateTime<Utc>,
}

impl FoodLogRow {
    fn into_log(self, food_items: Vec<FoodItem>) -> AppResult<FoodLog> {
        Ok(FoodLog {
            id: self.id,
            user_id: UserId::new(self.user_id),
            image_url: self.image_url,
            meal_type: self.meal_type.parse().map_err(AppError::internal)?,
            logged_date: self.logged_date,
            notes: self.notes,
            totals: NutritionTotals {
                calories: self.total_calories,
                protein: self.total_protein,
                carbs: self.total_carbs,
                fat: self.total_fat,
            },
            ai_confidence: self.ai_confidence,
            food_items,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FoodItemRow {
    food_name: String,
    serving_size: Option<String>,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
}

impl From<FoodItemRow> for FoodItem {
    fn from(row: FoodItemRow) -> Self {
        FoodItem {
            food_name: row.food_name,
            serving_size: row.serving_size,
            nutrition: NutritionTotals {
                calories: row.calories,
                protein: row.protein,
                carbs: row.carbs,
                fat: row.fat,
            },
        }
    }
}

#[async_trait]
impl FoodLogRepository for PostgresFoodLogRepository {
    async fn create(&self, log: &FoodLog) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("begin transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO food_logs (
                id, user_id, image_url, meal_type, logged_date, notes,
                total_calories, total_protein, total_carbs, total_fat,
                ai_confidence, created_at
            )
            VALUES ($1, $2::uuid, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(log.id)
        .bind(log.user_id.as_str())
        .bind(log.image_url.as_deref())
        .bind(log.meal_type.as_str())
        .bind(log.logged_date)
        .bind(log.notes.as_deref())
        .bind(log.totals.calories)
        .bind(log.totals.protein)
        .bind(log.totals.carbs)
        .bind(log.totals.fat)
        .bind(log.ai_confidence)
        .bind(log.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_error("insert food log"))?;

        for item in &log.food_items {
            sqlx::query(
                r#"
                INSERT INTO food_items (
                    id, food_log_id, food_name, serving_size, calories, protein, carbs, fat
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(fittrack_common::new_id())
            .bind(log.id)
            .bind(&item.food_name)
            .bind(item.serving_size.as_deref())
            .bind(item.nutrition.calories)
            .bind(item.nutrition.protein)
            .bind(item.nutrition.carbs)
            .bind(item.nutrition.fat)
            .execute(&mut *tx)
            .await
            .map_err(db_error("insert food item"))?;
        }

        tx.commit().await.map_err(db_error("commit food log"))?;

        debug!(log_id = %log.id, items = log.food_items.len(), "Food log inserted");
        Ok(())
    }

    async fn list(
        &self,
        user_id: &UserId,
        date: Option<NaiveDate>,
        limit: u32,
    ) -> AppResult<Vec<FoodLog>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM food_logs
            WHERE user_id = $1::uuid AND ($2::date IS NULL OR logged_date = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
            LOG_COLUMNS
        );
        let rows = sqlx::query_as::<_, FoodLogRow>(&sql)
            .bind(user_id.as_str())
            .bind(date)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list food logs"))?;

        rows.into_iter().map(|row| row.into_log(Vec::new())).collect()
    }

    async fn find_by_date(&self, user_id: &UserId, date: NaiveDate) -> AppResult<Vec<FoodLog>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM food_logs
            WHERE user_id = $1::uuid AND logged_date = $2
            ORDER BY created_at
            "#,
            LOG_COLUMNS
        );
        let rows = sqlx::query_as::<_, FoodLogRow>(&sql)
            .bind(user_id.as_str())
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("find food logs by date"))?;

        rows.into_iter().map(|row| row.into_log(Vec::new())).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FoodLog>> {
        let sql = format!("SELECT {} FROM food_logs WHERE id = $1", LOG_COLUMNS);
        let Some(row) = sqlx::query_as::<_, FoodLogRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find food log"))?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, FoodItemRow>(
            r#"
            SELECT food_name, serving_size, calories, protein, carbs, fat
            FROM food_items
            WHERE food_log_id = $1
            ORDER BY food_name
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("load food items"))?;

        row.into_log(items.into_iter().map(FoodItem::from).collect())
            .map(Some)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("begin transaction"))?;

        sqlx::query("DELETE FROM food_items WHERE food_log_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("delete food items"))?;
        let result = sqlx::query("DELETE FROM food_logs WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("delete food log"))?;

        tx.commit().await.map_err(db_error("commit delete"))?;
        Ok(result.rows_affected() > 0)
    }
}
