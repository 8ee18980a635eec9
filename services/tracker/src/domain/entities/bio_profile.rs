//! 身体档案实体

use chrono::{DateTime, Utc};
use fittrack_common::UserId;
use serde::{Deserialize, Serialize};

use crate::domain::services::calorie_calculator;
use crate::domain::value_objects::BioMetrics;

/// 默认每日步数目标
pub const DEFAULT_DAILY_STEP_GOAL: u32 = 10_000;

/// 默认每日饮水目标（杯）
pub const DEFAULT_DAILY_WATER_GOAL: u32 = 8;

/// 身体档案，每个用户一条，按 upsert 写入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BioProfile {
    pub user_id: UserId,
    #[serde(flatten)]
    pub metrics: BioMetrics,
    pub daily_calorie_goal: u32,
    pub daily_step_goal: u32,
    pub daily_water_goal_glasses: u32,
    pub updated_at: DateTime<Utc>,
}

impl BioProfile {
    /// 根据身体指标生成档案，热量目标由指标推算
    pub fn new(user_id: UserId, metrics: BioMetrics) -> Self {
        let daily_calorie_goal = calorie_calculator::daily_calorie_goal(&metrics);
        Self {
            user_id,
            metrics,
            daily_calorie_goal,
            daily_step_goal: DEFAULT_DAILY_STEP_GOAL,
            daily_water_goal_glasses: DEFAULT_DAILY_WATER_GOAL,
            updated_at: Utc::now(),
        }
    }

    pub fn with_goals(mut self, step_goal: Option<u32>, water_goal: Option<u32>) -> Self {
        if let Some(steps) = step_goal {
            self.daily_step_goal = steps;
        }
        if let Some(glasses) = water_goal {
            self.daily_water_goal_glasses = glasses;
        }
        self
    }
}
