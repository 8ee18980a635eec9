//! 对象存储 trait 定义

use async_trait::async_trait;
use fittrack_errors::AppResult;

/// 对象存储
#[async_trait]
pub trait ObjectStoragePort: Send + Sync {
    /// 上传对象
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<()>;

    /// 获取对象的公开访问 URL
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// 删除对象
    async fn remove(&self, bucket: &str, path: &str) -> AppResult<()>;
}
