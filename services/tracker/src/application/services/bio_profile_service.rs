//! 身体档案服务

use std::sync::Arc;

use fittrack_errors::{AppError, AppResult};
use serde::Deserialize;
use tracing::info;

use crate::domain::entities::BioProfile;
use crate::domain::repositories::BioProfileRepository;
use crate::domain::value_objects::{ActivityLevel, BioMetrics, Sex, WeightGoal};
use crate::identity::IdentityResolver;

/// 身体档案输入
#[derive(Debug, Clone, Deserialize)]
pub struct BioProfileInput {
    pub sex: Sex,
    pub age_years: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goal: WeightGoal,
    pub daily_step_goal: Option<u32>,
    pub daily_water_goal_glasses: Option<u32>,
}

pub struct BioProfileService {
    resolver: IdentityResolver,
    profiles: Arc<dyn BioProfileRepository>,
}

impl BioProfileService {
    pub fn new(resolver: IdentityResolver, profiles: Arc<dyn BioProfileRepository>) -> Self {
        Self { resolver, profiles }
    }

    /// 当前用户的身体档案，尚未填写时返回 None
    pub async fn current(&self) -> AppResult<Option<BioProfile>> {
        let user_id = self.resolver.get_or_resolve().await?;
        self.profiles.find_by_user(&user_id).await
    }

    /// 保存身体档案并重新计算热量目标
    pub async fn save(&self, input: BioProfileInput) -> AppResult<BioProfile> {
        let metrics = BioMetrics::new(
            input.sex,
            input.age_years,
            input.height_cm,
            input.weight_kg,
            input.activity_level,
            input.goal,
        )?;
        if input.daily_step_goal == Some(0) {
            return Err(AppError::validation("Daily step goal must be positive"));
        }
        if input.daily_water_goal_glasses == Some(0) {
            return Err(AppError::validation("Daily water goal must be positive"));
        }

        let user_id = self.resolver.get_or_resolve().await?;
        let profile = BioProfile::new(user_id, metrics)
            .with_goals(input.daily_step_goal, input.daily_water_goal_glasses);
        self.profiles.upsert(&profile).await?;

        info!(
            user_id = %profile.user_id,
            daily_calorie_goal = profile.daily_calorie_goal,
            "Bio profile saved"
        );
        Ok(profile)
    }
}
