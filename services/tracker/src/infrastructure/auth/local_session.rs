//! 进程内会话存储
//!
//! 持有当前会话身份，并把变更广播给订阅者。

use async_trait::async_trait;
use fittrack_common::SessionIdentity;
use fittrack_errors::AppResult;
use fittrack_ports::{AuthSessionPort, SessionEvent};
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

/// 事件通道容量
const EVENT_CAPACITY: usize = 16;

pub struct LocalSessionStore {
    current: RwLock<Option<SessionIdentity>>,
    events: broadcast::Sender<SessionEvent>,
}

impl LocalSessionStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            current: RwLock::new(None),
            events,
        }
    }

    /// 登录成功后记录会话
    pub fn sign_in(&self, session: SessionIdentity) {
        *self.current.write() = Some(session.clone());
        self.publish(SessionEvent::SignedIn(session));
    }

    /// 令牌刷新
    pub fn refresh(&self, session: SessionIdentity) {
        *self.current.write() = Some(session.clone());
        self.publish(SessionEvent::TokenRefreshed(session));
    }

    /// 会话被远端撤销或过期
    pub fn expire(&self) {
        self.end_session();
    }

    fn end_session(&self) {
        self.current.write().take();
        self.publish(SessionEvent::SignedOut);
    }

    fn publish(&self, event: SessionEvent) {
        // 没有订阅者时 send 返回错误，可以忽略
        if self.events.send(event).is_err() {
            debug!("No session event subscribers");
        }
    }
}

impl Default for LocalSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthSessionPort for LocalSessionStore {
    fn local_session(&self) -> Option<SessionIdentity> {
        self.current.read().clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn sign_out(&self) -> AppResult<()> {
        self.end_session();
        Ok(())
    }
}
