//! 本地文件系统对象存储
//!
//! 对象保存在 `{root}/{bucket}/{path}`，公开 URL 为 `{public_base_url}/{bucket}/{path}`。

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use fittrack_errors::{AppError, AppResult};
use fittrack_ports::ObjectStoragePort;
use tracing::{debug, warn};

pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn object_path(&self, bucket: &str, path: &str) -> AppResult<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if bucket.is_empty() || bucket.contains('/') || path.is_empty() || escapes {
            return Err(AppError::validation(format!(
                "Invalid object path: {}/{}",
                bucket, path
            )));
        }
        Ok(self.root.join(bucket).join(relative))
    }
}

#[async_trait]
impl ObjectStoragePort for LocalObjectStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<()> {
        let target = self.object_path(bucket, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::external_service(format!("Failed to create storage directory: {}", e))
            })?;
        }

        let size = bytes.len();
        tokio::fs::write(&target, bytes).await.map_err(|e| {
            warn!(error = %e, path = %target.display(), "Failed to write object");
            AppError::external_service(format!("Failed to upload {}: {}", path, e))
        })?;

        debug!(bucket, path, size, content_type, "Object uploaded");
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, bucket, path)
    }

    async fn remove(&self, bucket: &str, path: &str) -> AppResult<()> {
        let target = self.object_path(bucket, path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::external_service(format!(
                "Failed to remove {}: {}",
                path, e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_writes_under_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path(), "http://cdn.test/");

        storage
            .upload("photos", "user-1/front.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        let written = std::fs::read(dir.path().join("photos/user-1/front.png")).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
        assert_eq!(
            storage.public_url("photos", "user-1/front.png"),
            "http://cdn.test/photos/user-1/front.png"
        );
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path(), "http://cdn.test");

        let err = storage
            .upload("photos", "../escape.jpg", vec![0], "image/jpeg")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_remove_missing_object_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path(), "http://cdn.test");

        storage.remove("photos", "user-1/none.jpg").await.unwrap();
    }
}
