//! PostgreSQL 用户资料库实现
//!
//! `users` 表：`id` 为内部用户 ID，`auth_id` 为认证子系统签发的会话身份。
//! 两列均为 UUID，参数先解析为 `Uuid` 再绑定，比较直接落在列索引上。

use async_trait::async_trait;
use fittrack_common::{SessionIdentity, UserId};
use fittrack_errors::{AppError, AppResult};
use fittrack_ports::ProfileStorePort;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 非 UUID 的标识不可能命中任何行
fn parse_key(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

#[async_trait]
impl ProfileStorePort for PostgresProfileStore {
    async fn lookup_internal_id(&self, session: &SessionIdentity) -> AppResult<Option<UserId>> {
        let Some(auth_id) = parse_key(session.as_str()) else {
            debug!(session = %session, "Session identity is not a UUID");
            return Ok(None);
        };

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM users
            WHERE auth_id = $1
            LIMIT 1
            "#,
        )
        .bind(auth_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to look up user by auth id: {}", e)))?;

        Ok(id.map(|id| UserId::new(id.to_string())))
    }

    async fn user_exists(&self, id: &UserId) -> AppResult<bool> {
        let Some(id) = parse_key(id.as_str()) else {
            return Ok(false);
        };

        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check user: {}", e)))?;

        Ok(exists)
    }
}
