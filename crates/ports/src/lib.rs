//! ports - 抽象 trait 层
//!
//! 定义外部协作方（认证子系统、用户资料库、对象存储、营养数据与识别服务）的抽象接口

mod auth_session;
mod nutrition;
mod object_storage;
mod profile_store;

pub use auth_session::*;
pub use nutrition::*;
pub use object_storage::*;
pub use profile_store::*;
