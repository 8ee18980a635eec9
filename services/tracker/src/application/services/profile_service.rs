//! 用户资料服务

use std::sync::Arc;

use fittrack_errors::{AppError, AppResult};
use tracing::info;

use crate::domain::entities::Profile;
use crate::domain::repositories::ProfileRepository;
use crate::domain::value_objects::DisplayName;
use crate::identity::IdentityResolver;

pub struct ProfileService {
    resolver: IdentityResolver,
    profiles: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    pub fn new(resolver: IdentityResolver, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { resolver, profiles }
    }

    /// 当前登录用户的资料
    pub async fn current_profile(&self) -> AppResult<Profile> {
        let user_id = self.resolver.get_or_resolve().await?;
        self.profiles
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile not found"))
    }

    /// 修改显示名称
    pub async fn update_display_name(&self, name: &str) -> AppResult<Profile> {
        let name = DisplayName::new(name)?;
        let mut profile = self.current_profile().await?;
        profile.rename(name);
        self.profiles.update(&profile).await?;

        info!(user_id = %profile.id, "Display name updated");
        Ok(profile)
    }
}
