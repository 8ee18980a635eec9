//! 身份解析器
//!
//! 将认证子系统的会话身份映射为内部用户 ID 并缓存：
//! 1. 单槽缓存 - 解析成功后，后续请求同步读取，不再访问资料库
//! 2. Singleflight - 同一时间至多一个解析在进行，并发调用者等待同一个结果
//! 3. 代际计数 - `clear()` 之后完成的旧解析不会写回缓存

use std::sync::Arc;

use fittrack_common::{SessionIdentity, UserId};
use fittrack_errors::AppError;
use fittrack_ports::{AuthSessionPort, ProfileStorePort};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use thiserror::Error;

/// 身份解析错误
///
/// 三种错误都不会写入缓存，也不会自动重试。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// 本地没有会话
    #[error("Not authenticated")]
    NotAuthenticated,

    /// 有会话，但资料库中没有对应的用户记录
    #[error("No user profile for session {0}")]
    Resolution(SessionIdentity),

    /// 资料库查询失败
    #[error(transparent)]
    Backend(#[from] AppError),
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::NotAuthenticated => AppError::unauthenticated("Sign-in required"),
            IdentityError::Resolution(_) => AppError::not_found("User profile not found"),
            IdentityError::Backend(e) => e,
        }
    }
}

type PendingResolution = Shared<BoxFuture<'static, Result<UserId, IdentityError>>>;

#[derive(Default)]
struct ResolverState {
    cached: Option<UserId>,
    in_flight: Option<PendingResolution>,
    generation: u64,
}

struct Inner {
    auth: Arc<dyn AuthSessionPort>,
    store: Arc<dyn ProfileStorePort>,
    state: Mutex<ResolverState>,
}

impl Inner {
    async fn lookup(&self, session: &SessionIdentity) -> Result<UserId, IdentityError> {
        self.store
            .lookup_internal_id(session)
            .await?
            .ok_or_else(|| IdentityError::Resolution(session.clone()))
    }

    /// 记录解析结果；代际不匹配说明期间发生过 `clear()`，结果直接丢弃
    fn settle(&self, generation: u64, outcome: &Result<UserId, IdentityError>, in_flight: bool) {
        let mut state = self.state.lock();
        if state.generation != generation {
            return;
        }
        if in_flight {
            state.in_flight = None;
        }
        if let Ok(id) = outcome {
            state.cached = Some(id.clone());
        }
    }
}

/// 身份解析器
///
/// 显式构造后注入到每个需要当前用户 ID 的服务中；克隆共享同一份缓存。
#[derive(Clone)]
pub struct IdentityResolver {
    inner: Arc<Inner>,
}

impl IdentityResolver {
    pub fn new(auth: Arc<dyn AuthSessionPort>, store: Arc<dyn ProfileStorePort>) -> Self {
        Self {
            inner: Arc::new(Inner {
                auth,
                store,
                state: Mutex::new(ResolverState::default()),
            }),
        }
    }

    /// 同步读取缓存，不挂起、不失败
    pub fn cached_id(&self) -> Option<UserId> {
        self.inner.state.lock().cached.clone()
    }

    /// 是否有解析正在进行
    pub fn is_resolving(&self) -> bool {
        self.inner.state.lock().in_flight.is_some()
    }

    /// 用给定的会话身份查询资料库，成功后写入缓存
    pub async fn resolve(&self, session: &SessionIdentity) -> Result<UserId, IdentityError> {
        let generation = self.inner.state.lock().generation;
        let outcome = self.inner.lookup(session).await;
        self.inner.settle(generation, &outcome, false);
        outcome
    }

    /// 获取当前用户 ID
    ///
    /// 命中缓存时立即返回；已有解析在进行时等待它的结果；
    /// 否则读取本地会话并发起新的解析。
    pub async fn get_or_resolve(&self) -> Result<UserId, IdentityError> {
        let pending = {
            let mut state = self.inner.state.lock();
            if let Some(id) = &state.cached {
                return Ok(id.clone());
            }
            match &state.in_flight {
                Some(pending) => pending.clone(),
                None => {
                    let pending = Self::start_resolution(self.inner.clone(), state.generation);
                    state.in_flight = Some(pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// 清空缓存和进行中的解析，幂等
    ///
    /// 已经在等待旧解析的调用者仍会拿到它的结果，但该结果不会写入缓存。
    pub fn clear(&self) {
        let mut state = self.inner.state.lock();
        state.cached = None;
        state.in_flight = None;
        state.generation = state.generation.wrapping_add(1);
    }

    fn start_resolution(inner: Arc<Inner>, generation: u64) -> PendingResolution {
        async move {
            let outcome = match inner.auth.local_session() {
                Some(session) => inner.lookup(&session).await,
                None => Err(IdentityError::NotAuthenticated),
            };
            inner.settle(generation, &outcome, true);
            outcome
        }
        .boxed()
        .shared()
    }
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("IdentityResolver")
            .field("cached", &state.cached)
            .field("resolving", &state.in_flight.is_some())
            .field("generation", &state.generation)
            .finish()
    }
}
