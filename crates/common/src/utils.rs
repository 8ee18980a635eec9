//! 通用工具函数

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

/// 生成新的 UUID v7（时间有序）
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}

/// 当前 UTC 日期，日志类记录按天归档
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
