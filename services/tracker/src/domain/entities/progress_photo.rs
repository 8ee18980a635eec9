//! 进度照片实体

use chrono::{DateTime, NaiveDate, Utc};
use fittrack_common::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 进度照片
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressPhoto {
    pub id: Uuid,
    pub user_id: UserId,
    pub storage_path: String,
    pub url: String,
    pub taken_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl ProgressPhoto {
    /// 存储路径：`{user_id}/{filename}`
    pub fn storage_path(user_id: &UserId, filename: &str) -> String {
        format!("{}/{}", user_id, filename)
    }

    /// 按扩展名推断内容类型，默认 JPEG
    pub fn content_type(filename: &str) -> &'static str {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".png") {
            "image/png"
        } else if lower.ends_with(".webp") {
            "image/webp"
        } else {
            "image/jpeg"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(ProgressPhoto::content_type("front.png"), "image/png");
        assert_eq!(ProgressPhoto::content_type("SIDE.WEBP"), "image/webp");
        assert_eq!(ProgressPhoto::content_type("back.jpg"), "image/jpeg");
        assert_eq!(ProgressPhoto::content_type("noext"), "image/jpeg");
    }

    #[test]
    fn test_storage_path_is_scoped_by_user() {
        let path = ProgressPhoto::storage_path(&UserId::from("user-789"), "2026-03-14.jpg");
        assert_eq!(path, "user-789/2026-03-14.jpg");
    }
}
