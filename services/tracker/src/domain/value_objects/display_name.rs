//! 显示名称值对象

use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_CHARS: usize = 50;

/// 显示名称，去除首尾空白后 1-50 个字符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(name: impl AsRef<str>) -> Result<Self, DisplayNameError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(DisplayNameError::Empty);
        }
        let len = name.chars().count();
        if len > MAX_CHARS {
            return Err(DisplayNameError::TooLong(len));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 显示名称错误
#[derive(Debug, thiserror::Error)]
pub enum DisplayNameError {
    #[error("Display name must not be empty")]
    Empty,

    #[error("Display name is too long: {0} characters (max 50)")]
    TooLong(usize),
}
