//! 用户资料库 trait 定义

use async_trait::async_trait;
use fittrack_common::{SessionIdentity, UserId};
use fittrack_errors::AppResult;

/// 用户资料库
#[async_trait]
pub trait ProfileStorePort: Send + Sync {
    /// 根据会话身份查找内部用户 ID
    async fn lookup_internal_id(&self, session: &SessionIdentity) -> AppResult<Option<UserId>>;

    /// 内部用户 ID 是否存在
    async fn user_exists(&self, id: &UserId) -> AppResult<bool>;
}
