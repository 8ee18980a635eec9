//! 用户资料实体

use chrono::{DateTime, Utc};
use fittrack_common::{SessionIdentity, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::DisplayName;

/// 用户资料
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub auth_id: SessionIdentity,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn rename(&mut self, name: DisplayName) {
        self.display_name = Some(name.as_str().to_string());
        self.updated_at = Utc::now();
    }
}
