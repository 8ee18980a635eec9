//! 认证子系统适配

mod local_session;

pub use local_session::*;
