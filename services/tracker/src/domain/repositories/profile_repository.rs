//! 用户资料 Repository trait

use async_trait::async_trait;
use fittrack_common::UserId;
use fittrack_errors::AppResult;

use crate::domain::entities::Profile;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// 根据内部用户 ID 查找资料
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<Profile>>;

    /// 更新资料
    async fn update(&self, profile: &Profile) -> AppResult<()>;
}
