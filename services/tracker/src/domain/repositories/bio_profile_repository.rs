//! 身体档案 Repository trait

use async_trait::async_trait;
use fittrack_common::UserId;
use fittrack_errors::AppResult;

use crate::domain::entities::BioProfile;

#[async_trait]
pub trait BioProfileRepository: Send + Sync {
    /// 查找用户的身体档案
    async fn find_by_user(&self, user_id: &UserId) -> AppResult<Option<BioProfile>>;

    /// 插入或更新
    async fn upsert(&self, profile: &BioProfile) -> AppResult<()>;
}
