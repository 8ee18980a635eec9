//! 日常活动实体：饮水与步数

use chrono::NaiveDate;
use fittrack_common::UserId;
use serde::{Deserialize, Serialize};

/// 每日饮水记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterLog {
    pub user_id: UserId,
    pub logged_date: NaiveDate,
    pub glasses: u32,
}

impl WaterLog {
    pub fn empty(user_id: UserId, logged_date: NaiveDate) -> Self {
        Self {
            user_id,
            logged_date,
            glasses: 0,
        }
    }

    pub fn add_glass(&mut self) {
        self.glasses = self.glasses.saturating_add(1);
    }

    /// 减少一杯，不会低于 0
    pub fn remove_glass(&mut self) {
        self.glasses = self.glasses.saturating_sub(1);
    }
}

/// 每日步数记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepLog {
    pub user_id: UserId,
    pub logged_date: NaiveDate,
    pub steps: u32,
}

impl StepLog {
    pub fn empty(user_id: UserId, logged_date: NaiveDate) -> Self {
        Self {
            user_id,
            logged_date,
            steps: 0,
        }
    }

    /// 计步器上报的是当天累计值，只保留较大者
    pub fn record(&mut self, reported: u32) -> bool {
        if reported > self.steps {
            self.steps = reported;
            true
        } else {
            false
        }
    }
}

/// 当日进度
#[derive(Debug, Clone, Serialize)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub water_glasses: u32,
    pub water_goal_glasses: u32,
    pub steps: u32,
    pub step_goal: u32,
}

impl DailyProgress {
    pub fn water_ratio(&self) -> f64 {
        ratio(self.water_glasses, self.water_goal_glasses)
    }

    pub fn step_ratio(&self) -> f64 {
        ratio(self.steps, self.step_goal)
    }
}

fn ratio(value: u32, goal: u32) -> f64 {
    if goal == 0 {
        return 1.0;
    }
    (f64::from(value) / f64::from(goal)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn test_water_never_negative() {
        let mut log = WaterLog::empty(UserId::from("u"), date());
        log.remove_glass();
        assert_eq!(log.glasses, 0);
        log.add_glass();
        log.add_glass();
        log.remove_glass();
        assert_eq!(log.glasses, 1);
    }

    #[test]
    fn test_steps_keep_daily_maximum() {
        let mut log = StepLog::empty(UserId::from("u"), date());
        assert!(log.record(4_200));
        assert!(!log.record(3_900));
        assert_eq!(log.steps, 4_200);
    }

    #[test]
    fn test_progress_ratio_is_capped() {
        let progress = DailyProgress {
            date: date(),
            water_glasses: 12,
            water_goal_glasses: 8,
            steps: 5_000,
            step_goal: 10_000,
        };
        assert_eq!(progress.water_ratio(), 1.0);
        assert_eq!(progress.step_ratio(), 0.5);
    }
}
