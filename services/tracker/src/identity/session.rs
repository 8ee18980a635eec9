//! 会话控制
//!
//! 登出是唯一清空身份缓存的路径：本地主动登出走 `sign_out`，
//! 远端撤销或过期通过会话事件到达 `watch`。

use std::sync::Arc;

use fittrack_errors::AppResult;
use fittrack_ports::{AuthSessionPort, SessionEvent};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::IdentityResolver;

pub struct SessionController {
    auth: Arc<dyn AuthSessionPort>,
    resolver: IdentityResolver,
}

impl SessionController {
    pub fn new(auth: Arc<dyn AuthSessionPort>, resolver: IdentityResolver) -> Self {
        Self { auth, resolver }
    }

    /// 登出
    ///
    /// 后端登出失败时本地缓存仍然清空，错误返回给调用者。
    pub async fn sign_out(&self) -> AppResult<()> {
        let result = self.auth.sign_out().await;
        self.resolver.clear();

        match &result {
            Ok(()) => info!("Signed out"),
            Err(e) => warn!(error = %e, "Backend sign-out failed, identity cache cleared anyway"),
        }
        result
    }

    /// 监听会话变更事件，会话结束时清空身份缓存
    pub fn watch(&self) -> JoinHandle<()> {
        let mut events = self.auth.subscribe();
        let auth = self.auth.clone();
        let resolver = self.resolver.clone();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(SessionEvent::SignedOut) => {
                        resolver.clear();
                        debug!("Session ended, identity cache cleared");
                    }
                    Ok(event) => debug!(?event, "Session event"),
                    Err(RecvError::Lagged(skipped)) => {
                        // 丢失的事件里可能有登出，以本地会话为准
                        if auth.local_session().is_none() {
                            resolver.clear();
                        }
                        warn!(skipped, "Session events lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!("Session event stream closed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::auth::LocalSessionStore;
    use async_trait::async_trait;
    use fittrack_common::{SessionIdentity, UserId};
    use fittrack_errors::AppError;
    use fittrack_ports::ProfileStorePort;
    use std::time::Duration;

    struct FixedStore;

    #[async_trait]
    impl ProfileStorePort for FixedStore {
        async fn lookup_internal_id(&self, session: &SessionIdentity) -> AppResult<Option<UserId>> {
            Ok(Some(UserId::new(format!("user-for-{}", session))))
        }

        async fn user_exists(&self, _id: &UserId) -> AppResult<bool> {
            Ok(true)
        }
    }

    struct FailingSignOut {
        inner: LocalSessionStore,
    }

    #[async_trait]
    impl AuthSessionPort for FailingSignOut {
        fn local_session(&self) -> Option<SessionIdentity> {
            self.inner.local_session()
        }

        fn subscribe(&self) -> tokio::sync::broadcast::Receiver<SessionEvent> {
            self.inner.subscribe()
        }

        async fn sign_out(&self) -> AppResult<()> {
            Err(AppError::external_service("auth backend unreachable"))
        }
    }

    async fn wait_until_cleared(resolver: &IdentityResolver) {
        for _ in 0..100 {
            if resolver.cached_id().is_none() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("identity cache was not cleared");
    }

    #[tokio::test]
    async fn test_sign_out_clears_cache() {
        let auth = Arc::new(LocalSessionStore::new());
        auth.sign_in(SessionIdentity::from("auth-123"));
        let resolver = IdentityResolver::new(auth.clone(), Arc::new(FixedStore));
        let controller = SessionController::new(auth.clone(), resolver.clone());

        resolver.get_or_resolve().await.unwrap();
        assert!(resolver.cached_id().is_some());

        controller.sign_out().await.unwrap();
        assert_eq!(resolver.cached_id(), None);
        assert_eq!(auth.local_session(), None);
    }

    #[tokio::test]
    async fn test_failed_backend_sign_out_still_clears_cache() {
        let inner = LocalSessionStore::new();
        inner.sign_in(SessionIdentity::from("auth-123"));
        let auth = Arc::new(FailingSignOut { inner });
        let resolver = IdentityResolver::new(auth.clone(), Arc::new(FixedStore));
        let controller = SessionController::new(auth, resolver.clone());

        resolver.get_or_resolve().await.unwrap();
        let err = controller.sign_out().await.unwrap_err();

        assert_eq!(err.status_code(), 502);
        assert_eq!(resolver.cached_id(), None);
    }

    #[tokio::test]
    async fn test_remote_sign_out_event_clears_cache() {
        let auth = Arc::new(LocalSessionStore::new());
        auth.sign_in(SessionIdentity::from("auth-123"));
        let resolver = IdentityResolver::new(auth.clone(), Arc::new(FixedStore));
        let controller = SessionController::new(auth.clone(), resolver.clone());
        let watcher = controller.watch();

        resolver.get_or_resolve().await.unwrap();
        auth.expire();

        wait_until_cleared(&resolver).await;
        watcher.abort();
    }

    #[tokio::test]
    async fn test_sign_in_and_refresh_events_keep_cache() {
        let auth = Arc::new(LocalSessionStore::new());
        auth.sign_in(SessionIdentity::from("auth-123"));
        let resolver = IdentityResolver::new(auth.clone(), Arc::new(FixedStore));
        let controller = SessionController::new(auth.clone(), resolver.clone());
        let watcher = controller.watch();

        let id = resolver.get_or_resolve().await.unwrap();
        auth.refresh(SessionIdentity::from("auth-123"));
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(resolver.cached_id(), Some(id));
        watcher.abort();
    }
}
