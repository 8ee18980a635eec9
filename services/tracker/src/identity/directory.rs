//! 用户目录
//!
//! HTTP 接口允许调用方传入内部用户 ID 或会话身份，这里统一解析为内部用户 ID。
//! 与 `IdentityResolver` 不同，目录按请求解析，不缓存。

use std::sync::Arc;

use fittrack_common::{SessionIdentity, UserId};
use fittrack_errors::{AppError, AppResult};
use fittrack_ports::ProfileStorePort;

pub struct UserDirectory {
    store: Arc<dyn ProfileStorePort>,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn ProfileStorePort>) -> Self {
        Self { store }
    }

    /// 先按内部用户 ID 查找，再按会话身份查找
    pub async fn resolve_identifier(&self, raw: &str) -> AppResult<UserId> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::validation("User identifier must not be empty"));
        }

        let candidate = UserId::new(raw);
        if self.store.user_exists(&candidate).await? {
            return Ok(candidate);
        }

        self.store
            .lookup_internal_id(&SessionIdentity::new(raw))
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StaticStore;

    #[async_trait]
    impl ProfileStorePort for StaticStore {
        async fn lookup_internal_id(&self, session: &SessionIdentity) -> AppResult<Option<UserId>> {
            Ok((session.as_str() == "auth-123").then(|| UserId::from("user-789")))
        }

        async fn user_exists(&self, id: &UserId) -> AppResult<bool> {
            Ok(id.as_str() == "user-789")
        }
    }

    fn directory() -> UserDirectory {
        UserDirectory::new(Arc::new(StaticStore))
    }

    #[tokio::test]
    async fn test_internal_id_resolves_to_itself() {
        let id = directory().resolve_identifier("user-789").await.unwrap();
        assert_eq!(id, UserId::from("user-789"));
    }

    #[tokio::test]
    async fn test_session_identity_resolves_to_internal_id() {
        let id = directory().resolve_identifier(" auth-123 ").await.unwrap();
        assert_eq!(id, UserId::from("user-789"));
    }

    #[tokio::test]
    async fn test_unknown_identifier_is_not_found() {
        let err = directory().resolve_identifier("nobody").await.unwrap_err();
        assert_eq!(err, AppError::not_found("User not found"));
    }

    #[tokio::test]
    async fn test_blank_identifier_is_rejected() {
        let err = directory().resolve_identifier("   ").await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
