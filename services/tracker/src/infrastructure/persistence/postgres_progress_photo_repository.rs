//! PostgreSQL 进度照片仓储实现

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use fittrack_common::UserId;
use fittrack_errors::AppResult;
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;
use crate::domain::entities::ProgressPhoto;
use crate::domain::repositories::ProgressPhotoRepository;

pub struct PostgresProgressPhotoRepository {
    pool: PgPool,
}

impl PostgresProgressPhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PhotoRow {
    id: Uuid,
    user_id: String,
    storage_path: String,
    url: String,
    taken_on: NaiveDate,
    created_at: DateTime<Utc>,
}

impl From<PhotoRow> for ProgressPhoto {
    fn from(row: PhotoRow) -> Self {
        ProgressPhoto {
            id: row.id,
            user_id: UserId::new(row.user_id),
            storage_path: row.storage_path,
            url: row.url,
            taken_on: row.taken_on,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ProgressPhotoRepository for PostgresProgressPhotoRepository {
    async fn save(&self, photo: &ProgressPhoto) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO progress_photos (id, user_id, storage_path, url, taken_on, created_at)
            VALUES ($1, $2::uuid, $3, $4, $5, $6)
            "#,
        )
        .bind(photo.id)
        .bind(photo.user_id.as_str())
        .bind(&photo.storage_path)
        .bind(&photo.url)
        .bind(photo.taken_on)
        .bind(photo.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("save progress photo"))?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: &UserId) -> AppResult<Vec<ProgressPhoto>> {
        let rows = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT id, user_id::text AS user_id, storage_path, url, taken_on, created_at
            FROM progress_photos
            WHERE user_id = $1::uuid
            ORDER BY taken_on DESC, created_at DESC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list progress photos"))?;

        Ok(rows.into_iter().map(ProgressPhoto::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ProgressPhoto>> {
        let row = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT id, user_id::text AS user_id, storage_path, url, taken_on, created_at
            FROM progress_photos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find progress photo"))?;

        Ok(row.map(ProgressPhoto::from))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM progress_photos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete progress photo"))?;
        Ok(())
    }
}
