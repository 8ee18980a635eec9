//! 热量目标估算
//!
//! Mifflin-St Jeor 公式计算基础代谢，乘以活动系数得到每日总消耗，
//! 再按体重目标调整。

use crate::domain::value_objects::{BioMetrics, Sex};

/// 每日热量目标下限（千卡）
pub const MIN_DAILY_CALORIES: u32 = 1200;

/// 基础代谢率（千卡/天）
pub fn basal_metabolic_rate(metrics: &BioMetrics) -> f64 {
    let base = 10.0 * metrics.weight_kg + 6.25 * metrics.height_cm
        - 5.0 * f64::from(metrics.age_years);
    match metrics.sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// 每日总能量消耗
pub fn total_daily_energy_expenditure(metrics: &BioMetrics) -> f64 {
    basal_metabolic_rate(metrics) * metrics.activity_level.factor()
}

/// 每日热量目标，取整到 10 千卡，不低于下限
pub fn daily_calorie_goal(metrics: &BioMetrics) -> u32 {
    let target = total_daily_energy_expenditure(metrics) + metrics.goal.adjustment();
    let rounded = ((target / 10.0).round() * 10.0).max(0.0) as u32;
    rounded.max(MIN_DAILY_CALORIES)
}
