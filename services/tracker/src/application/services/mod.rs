//! 应用服务
//!
//! 会话范围的服务只通过 `IdentityResolver::get_or_resolve` 获取当前用户 ID。

mod activity_service;
mod bio_profile_service;
mod food_log_service;
mod nutrition_service;
mod profile_service;
mod progress_photo_service;
mod recognition_service;

pub use activity_service::*;
pub use bio_profile_service::*;
pub use food_log_service::*;
pub use nutrition_service::*;
pub use profile_service::*;
pub use progress_photo_service::*;
pub use recognition_service::*;
