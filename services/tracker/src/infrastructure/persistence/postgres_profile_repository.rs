//! PostgreSQL 用户资料仓储实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fittrack_common::{SessionIdentity, UserId};
use fittrack_errors::AppResult;
use sqlx::PgPool;
use tracing::debug;

use super::db_error;
use crate::domain::entities::Profile;
use crate::domain::repositories::ProfileRepository;

pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: String,
    auth_id: String,
    display_name: Option<String>,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: UserId::new(row.id),
            auth_id: SessionIdentity::new(row.auth_id),
            display_name: row.display_name,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<Profile>> {
        debug!(user_id = %id, "Finding profile by ID");

        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id::text AS id, auth_id::text AS auth_id, display_name, email,
                   created_at, updated_at
            FROM users
            WHERE id = $1::uuid
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find profile"))?;

        Ok(row.map(Profile::from))
    }

    async fn update(&self, profile: &Profile) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET display_name = $2, updated_at = $3
            WHERE id = $1::uuid
            "#,
        )
        .bind(profile.id.as_str())
        .bind(profile.display_name.as_deref())
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("update profile"))?;

        debug!(user_id = %profile.id, "Profile updated");
        Ok(())
    }
}
