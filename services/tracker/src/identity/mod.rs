//! 身份模块
//!
//! - `resolver`: 会话身份 → 内部用户 ID 的缓存解析
//! - `session`: 登出路径与会话事件监听
//! - `directory`: HTTP 接口使用的按请求解析

mod directory;
mod resolver;
mod session;

pub use directory::*;
pub use resolver::*;
pub use session::*;
