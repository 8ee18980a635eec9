//! 进度照片 Repository trait

use async_trait::async_trait;
use fittrack_common::UserId;
use fittrack_errors::AppResult;
use uuid::Uuid;

use crate::domain::entities::ProgressPhoto;

#[async_trait]
pub trait ProgressPhotoRepository: Send + Sync {
    /// 保存照片记录
    async fn save(&self, photo: &ProgressPhoto) -> AppResult<()>;

    /// 按拍摄日期倒序列出
    async fn list_by_user(&self, user_id: &UserId) -> AppResult<Vec<ProgressPhoto>>;

    /// 根据 ID 查找
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ProgressPhoto>>;

    /// 删除记录
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}
