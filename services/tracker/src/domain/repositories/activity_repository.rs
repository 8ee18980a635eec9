//! 日常活动 Repository trait

use async_trait::async_trait;
use chrono::NaiveDate;
use fittrack_common::UserId;
use fittrack_errors::AppResult;

use crate::domain::entities::{StepLog, WaterLog};

/// 写操作都在存储内部原子完成，并返回写入后的记录
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// 查找某天的饮水记录
    async fn find_water(&self, user_id: &UserId, date: NaiveDate) -> AppResult<Option<WaterLog>>;

    /// 饮水加一杯，当天无记录时从 0 开始
    async fn increment_water(&self, user_id: &UserId, date: NaiveDate) -> AppResult<WaterLog>;

    /// 饮水减一杯，不低于 0
    async fn decrement_water(&self, user_id: &UserId, date: NaiveDate) -> AppResult<WaterLog>;

    /// 查找某天的步数记录
    async fn find_steps(&self, user_id: &UserId, date: NaiveDate) -> AppResult<Option<StepLog>>;

    /// 写入计步器读数，只保留当天最大值
    async fn record_steps_max(
        &self,
        user_id: &UserId,
        date: NaiveDate,
        steps: u32,
    ) -> AppResult<StepLog>;
}
