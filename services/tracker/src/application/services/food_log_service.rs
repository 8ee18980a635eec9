//! 饮食日志服务

use std::sync::Arc;

use chrono::NaiveDate;
use fittrack_common::UserId;
use fittrack_errors::{AppError, AppResult};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::{DailySummary, FoodItem, FoodLog, MealType};
use crate::domain::repositories::FoodLogRepository;

pub const DEFAULT_LIST_LIMIT: u32 = 50;
pub const MAX_LIST_LIMIT: u32 = 200;

/// 手动录入的饮食日志
#[derive(Debug, Clone, Deserialize)]
pub struct ManualFoodEntry {
    pub user_id: UserId,
    pub meal_type: MealType,
    pub logged_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    pub food_items: Vec<FoodItem>,
}

impl ManualFoodEntry {
    /// 不含食物条目的日志合法，合计为 0
    fn validate(&self) -> AppResult<()> {
        for item in &self.food_items {
            if item.food_name.trim().is_empty() {
                return Err(AppError::validation("Food name cannot be empty"));
            }
            let n = &item.nutrition;
            if [n.calories, n.protein, n.carbs, n.fat]
                .iter()
                .any(|v| !v.is_finite() || *v < 0.0)
            {
                return Err(AppError::validation(format!(
                    "Nutrition values for '{}' must be non-negative",
                    item.food_name
                )));
            }
        }
        Ok(())
    }
}

pub struct FoodLogService {
    logs: Arc<dyn FoodLogRepository>,
}

impl FoodLogService {
    pub fn new(logs: Arc<dyn FoodLogRepository>) -> Self {
        Self { logs }
    }

    /// 手动创建日志
    pub async fn create_manual(&self, entry: ManualFoodEntry) -> AppResult<FoodLog> {
        entry.validate()?;

        let log = FoodLog::manual(
            entry.user_id,
            entry.meal_type,
            entry.logged_date,
            entry.notes,
            entry.food_items,
        );
        self.logs.create(&log).await?;

        info!(
            user_id = %log.user_id,
            log_id = %log.id,
            calories = log.totals.calories,
            "Food log created"
        );
        Ok(log)
    }

    pub async fn list(
        &self,
        user_id: &UserId,
        date: Option<NaiveDate>,
        limit: Option<u32>,
    ) -> AppResult<Vec<FoodLog>> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        if !(1..=MAX_LIST_LIMIT).contains(&limit) {
            return Err(AppError::validation(format!(
                "limit must be between 1 and {}",
                MAX_LIST_LIMIT
            )));
        }
        self.logs.list(user_id, date, limit).await
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<FoodLog> {
        self.logs
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Food log not found"))
    }

    pub async fn daily_summary(&self, user_id: &UserId, date: NaiveDate) -> AppResult<DailySummary> {
        let logs = self.logs.find_by_date(user_id, date).await?;
        Ok(DailySummary::from_logs(date, &logs))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.logs.delete(id).await? {
            return Err(AppError::not_found("Food log not found"));
        }
        info!(log_id = %id, "Food log deleted");
        Ok(())
    }
}
