//! 进度照片服务

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use fittrack_errors::{AppError, AppResult};
use fittrack_ports::ObjectStoragePort;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::ProgressPhoto;
use crate::domain::repositories::ProgressPhotoRepository;
use crate::identity::IdentityResolver;

pub struct ProgressPhotoService {
    resolver: IdentityResolver,
    storage: Arc<dyn ObjectStoragePort>,
    photos: Arc<dyn ProgressPhotoRepository>,
    bucket: Option<String>,
}

impl ProgressPhotoService {
    pub fn new(
        resolver: IdentityResolver,
        storage: Arc<dyn ObjectStoragePort>,
        photos: Arc<dyn ProgressPhotoRepository>,
        bucket: Option<String>,
    ) -> Self {
        Self {
            resolver,
            storage,
            photos,
            bucket,
        }
    }

    /// 上传照片；未配置存储桶时返回 None
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        taken_on: NaiveDate,
    ) -> AppResult<Option<ProgressPhoto>> {
        let Some(bucket) = self.bucket.as_deref() else {
            warn!("Photo storage bucket not configured, skipping upload");
            return Ok(None);
        };
        if bytes.is_empty() {
            return Err(AppError::validation("Photo is empty"));
        }
        if filename.trim().is_empty() || filename.contains('/') {
            return Err(AppError::validation("Invalid photo filename"));
        }

        let user_id = self.resolver.get_or_resolve().await?;
        let path = ProgressPhoto::storage_path(&user_id, filename);
        let content_type = ProgressPhoto::content_type(filename);
        self.storage
            .upload(bucket, &path, bytes, content_type)
            .await?;

        let photo = ProgressPhoto {
            id: fittrack_common::new_id(),
            user_id,
            url: self.storage.public_url(bucket, &path),
            storage_path: path,
            taken_on,
            created_at: Utc::now(),
        };
        if let Err(err) = self.photos.save(&photo).await {
            self.discard_object(bucket, &photo.storage_path).await;
            return Err(err);
        }

        info!(user_id = %photo.user_id, path = %photo.storage_path, "Progress photo uploaded");
        Ok(Some(photo))
    }

    /// 元数据写入失败后删除已上传的对象，删除失败只记录日志
    async fn discard_object(&self, bucket: &str, path: &str) {
        if let Err(err) = self.storage.remove(bucket, path).await {
            warn!(error = %err, path = %path, "Failed to remove orphaned photo object");
        }
    }

    /// 当前用户的照片
    pub async fn list(&self) -> AppResult<Vec<ProgressPhoto>> {
        let user_id = self.resolver.get_or_resolve().await?;
        self.photos.list_by_user(&user_id).await
    }

    /// 删除自己的照片
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let user_id = self.resolver.get_or_resolve().await?;
        let photo = self
            .photos
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Photo not found"))?;
        if photo.user_id != user_id {
            return Err(AppError::forbidden("Photo belongs to another user"));
        }

        if let Some(bucket) = self.bucket.as_deref() {
            self.storage.remove(bucket, &photo.storage_path).await?;
        }
        self.photos.delete(id).await?;

        info!(user_id = %user_id, photo_id = %id, "Progress photo deleted");
        Ok(())
    }
}
