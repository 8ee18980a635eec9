//! 饮食日志 Repository trait

use async_trait::async_trait;
use chrono::NaiveDate;
use fittrack_common::UserId;
use fittrack_errors::AppResult;
use uuid::Uuid;

use crate::domain::entities::FoodLog;

#[async_trait]
pub trait FoodLogRepository: Send + Sync {
    /// 创建日志及其条目
    async fn create(&self, log: &FoodLog) -> AppResult<()>;

    /// 按创建时间倒序列出用户的日志（不含条目）
    async fn list(
        &self,
        user_id: &UserId,
        date: Option<NaiveDate>,
        limit: u32,
    ) -> AppResult<Vec<FoodLog>>;

    /// 某天的全部日志（用于每日汇总，不含条目）
    async fn find_by_date(&self, user_id: &UserId, date: NaiveDate) -> AppResult<Vec<FoodLog>>;

    /// 根据 ID 查找日志（含条目）
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FoodLog>>;

    /// 删除日志，返回是否存在
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}
