//! PostgreSQL 持久化实现

mod postgres_activity_repository;
mod postgres_bio_profile_repository;
mod postgres_food_log_repository;
mod postgres_profile_repository;
mod postgres_progress_photo_repository;

pub use postgres_activity_repository::*;
pub use postgres_bio_profile_repository::*;
pub use postgres_food_log_repository::*;
pub use postgres_profile_repository::*;
pub use postgres_progress_photo_repository::*;

use fittrack_errors::AppError;
use tracing::warn;

/// 记录并转换数据库错误
pub(crate) fn db_error(action: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        warn!(error = %e, "Failed to {}", action);
        AppError::database(format!("Failed to {}: {}", action, e))
    }
}

/// 计数写入 INTEGER 列，超出范围视为校验错误
pub(crate) fn to_db_count(value: u32, field: &str) -> Result<i32, AppError> {
    i32::try_from(value)
        .map_err(|_| AppError::validation(format!("{} must be at most {}", field, i32::MAX)))
}

/// INTEGER 列读回计数，负值按 0 处理
pub(crate) fn from_db_count(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}
