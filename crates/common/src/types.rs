//! 通用类型定义

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// 会话身份
///
/// 认证子系统签发的不透明标识（对应 `users.auth_id`），未登录时不存在。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
#[serde(transparent)]
pub struct SessionIdentity(pub String);

impl SessionIdentity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionIdentity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// 内部用户 ID
///
/// 所有业务记录（资料、体征、照片、饮水/步数、饮食日志）引用的用户主键，
/// 与会话身份不同。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_display_raw_value() {
        assert_eq!(SessionIdentity::from("auth-123").to_string(), "auth-123");
        assert_eq!(UserId::from("user-789").to_string(), "user-789");
    }

    #[test]
    fn test_identifiers_serialize_transparently() {
        let json = serde_json::to_string(&UserId::from("user-789")).unwrap();
        assert_eq!(json, "\"user-789\"");

        let session: SessionIdentity = serde_json::from_str("\"auth-123\"").unwrap();
        assert_eq!(session.as_str(), "auth-123");
    }
}
