//! 日常活动服务：饮水与步数

use std::sync::Arc;

use chrono::NaiveDate;
use fittrack_common::UserId;
use fittrack_errors::AppResult;
use tracing::debug;

use crate::domain::entities::{
    DEFAULT_DAILY_STEP_GOAL, DEFAULT_DAILY_WATER_GOAL, DailyProgress, StepLog, WaterLog,
};
use crate::domain::repositories::{ActivityRepository, BioProfileRepository};
use crate::identity::IdentityResolver;

pub struct ActivityService {
    resolver: IdentityResolver,
    activity: Arc<dyn ActivityRepository>,
    bio_profiles: Arc<dyn BioProfileRepository>,
}

impl ActivityService {
    pub fn new(
        resolver: IdentityResolver,
        activity: Arc<dyn ActivityRepository>,
        bio_profiles: Arc<dyn BioProfileRepository>,
    ) -> Self {
        Self {
            resolver,
            activity,
            bio_profiles,
        }
    }

    /// 某天的饮水记录
    pub async fn water_today(&self, date: NaiveDate) -> AppResult<WaterLog> {
        let user_id = self.resolver.get_or_resolve().await?;
        self.load_water(user_id, date).await
    }

    /// 加一杯
    pub async fn add_glass(&self, date: NaiveDate) -> AppResult<WaterLog> {
        let user_id = self.resolver.get_or_resolve().await?;
        let log = self.activity.increment_water(&user_id, date).await?;

        debug!(user_id = %log.user_id, glasses = log.glasses, "Water glass added");
        Ok(log)
    }

    /// 减一杯，已为 0 时不变
    pub async fn remove_glass(&self, date: NaiveDate) -> AppResult<WaterLog> {
        let user_id = self.resolver.get_or_resolve().await?;
        let log = self.activity.decrement_water(&user_id, date).await?;

        debug!(user_id = %log.user_id, glasses = log.glasses, "Water glass removed");
        Ok(log)
    }

    /// 记录计步器读数，较小的读数不会覆盖当天已有的最大值
    pub async fn record_steps(&self, date: NaiveDate, steps: u32) -> AppResult<StepLog> {
        let user_id = self.resolver.get_or_resolve().await?;
        let log = self.activity.record_steps_max(&user_id, date, steps).await?;

        debug!(user_id = %log.user_id, reported = steps, steps = log.steps, "Steps recorded");
        Ok(log)
    }

    /// 某天的步数记录
    pub async fn steps_for(&self, date: NaiveDate) -> AppResult<StepLog> {
        let user_id = self.resolver.get_or_resolve().await?;
        self.load_steps(user_id, date).await
    }

    /// 当日饮水和步数相对目标的进度
    pub async fn daily_progress(&self, date: NaiveDate) -> AppResult<DailyProgress> {
        let user_id = self.resolver.get_or_resolve().await?;
        let water = self.load_water(user_id.clone(), date).await?;
        let steps = self.load_steps(user_id.clone(), date).await?;
        let (step_goal, water_goal) = match self.bio_profiles.find_by_user(&user_id).await? {
            Some(profile) => (profile.daily_step_goal, profile.daily_water_goal_glasses),
            None => (DEFAULT_DAILY_STEP_GOAL, DEFAULT_DAILY_WATER_GOAL),
        };

        Ok(DailyProgress {
            date,
            water_glasses: water.glasses,
            water_goal_glasses: water_goal,
            steps: steps.steps,
            step_goal,
        })
    }

    async fn load_water(&self, user_id: UserId, date: NaiveDate) -> AppResult<WaterLog> {
        Ok(self
            .activity
            .find_water(&user_id, date)
            .await?
            .unwrap_or_else(|| WaterLog::empty(user_id, date)))
    }

    async fn load_steps(&self, user_id: UserId, date: NaiveDate) -> AppResult<StepLog> {
        Ok(self
            .activity
            .find_steps(&user_id, date)
            .await?
            .unwrap_or_else(|| StepLog::empty(user_id, date)))
    }
}
