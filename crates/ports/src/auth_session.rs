//! 认证子系统 trait 定义

use async_trait::async_trait;
use fittrack_common::SessionIdentity;
use fittrack_errors::AppResult;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// 会话变更事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "session", rename_all = "snake_case")]
pub enum SessionEvent {
    /// 登录成功
    SignedIn(SessionIdentity),
    /// 令牌刷新，会话身份不变
    TokenRefreshed(SessionIdentity),
    /// 会话结束（主动登出、远端撤销或过期）
    SignedOut,
}

/// 认证子系统
#[async_trait]
pub trait AuthSessionPort: Send + Sync {
    /// 读取本地会话，不发起网络请求
    fn local_session(&self) -> Option<SessionIdentity>;

    /// 订阅会话变更
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;

    /// 登出
    async fn sign_out(&self) -> AppResult<()>;
}
