//! fittrack-tracker - 健身追踪服务
//!
//! 核心是 [`identity::IdentityResolver`]：把认证子系统的会话身份解析为内部用户 ID，
//! 结果按会话缓存，并发请求共享同一次查询。

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod identity;
pub mod infrastructure;
pub mod runtime;
