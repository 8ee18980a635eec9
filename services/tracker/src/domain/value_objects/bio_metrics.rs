//! 身体指标值对象

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 性别（用于基础代谢估算）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl FromStr for Sex {
    type Err = BioMetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(BioMetricsError::UnknownValue("sex", other.to_string())),
        }
    }
}

/// 日常活动水平
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// 活动系数（TDEE = BMR × 系数）
    pub fn factor(&self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::Active => 1.725,
            Self::VeryActive => 1.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "very_active",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = BioMetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sedentary" => Ok(Self::Sedentary),
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "active" => Ok(Self::Active),
            "very_active" => Ok(Self::VeryActive),
            other => Err(BioMetricsError::UnknownValue(
                "activity_level",
                other.to_string(),
            )),
        }
    }
}

/// 体重目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightGoal {
    Lose,
    #[default]
    Maintain,
    Gain,
}

impl WeightGoal {
    /// 每日热量调整（千卡）
    pub fn adjustment(&self) -> f64 {
        match self {
            Self::Lose => -500.0,
            Self::Maintain => 0.0,
            Self::Gain => 300.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lose => "lose",
            Self::Maintain => "maintain",
            Self::Gain => "gain",
        }
    }
}

impl FromStr for WeightGoal {
    type Err = BioMetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lose" => Ok(Self::Lose),
            "maintain" => Ok(Self::Maintain),
            "gain" => Ok(Self::Gain),
            other => Err(BioMetricsError::UnknownValue("goal", other.to_string())),
        }
    }
}

/// 身体指标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BioMetrics {
    pub sex: Sex,
    pub age_years: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub goal: WeightGoal,
}

impl BioMetrics {
    pub fn new(
        sex: Sex,
        age_years: u32,
        height_cm: f64,
        weight_kg: f64,
        activity_level: ActivityLevel,
        goal: WeightGoal,
    ) -> Result<Self, BioMetricsError> {
        if !(13..=120).contains(&age_years) {
            return Err(BioMetricsError::OutOfRange("age_years", f64::from(age_years)));
        }
        if !(100.0..=250.0).contains(&height_cm) {
            return Err(BioMetricsError::OutOfRange("height_cm", height_cm));
        }
        if !(30.0..=300.0).contains(&weight_kg) {
            return Err(BioMetricsError::OutOfRange("weight_kg", weight_kg));
        }

        Ok(Self {
            sex,
            age_years,
            height_cm,
            weight_kg,
            activity_level,
            goal,
        })
    }
}

/// 身体指标错误
#[derive(Debug, thiserror::Error)]
pub enum BioMetricsError {
    #[error("{0} out of range: {1}")]
    OutOfRange(&'static str, f64),

    #[error("Unknown {0}: {1}")]
    UnknownValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_typical_adult() {
        let metrics = BioMetrics::new(
            Sex::Female,
            30,
            165.0,
            60.0,
            ActivityLevel::Light,
            WeightGoal::Maintain,
        );
        assert!(metrics.is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let too_young = BioMetrics::new(Sex::Male, 12, 170.0, 70.0, ActivityLevel::Moderate, WeightGoal::Lose);
        assert!(matches!(too_young, Err(BioMetricsError::OutOfRange("age_years", _))));

        let nan_weight = BioMetrics::new(Sex::Male, 30, 170.0, f64::NAN, ActivityLevel::Moderate, WeightGoal::Lose);
        assert!(matches!(nan_weight, Err(BioMetricsError::OutOfRange("weight_kg", _))));
    }

    #[test]
    fn test_enum_text_round_trip() {
        for level in [
            ActivityLevel::Sedentary,
            ActivityLevel::Light,
            ActivityLevel::Moderate,
            ActivityLevel::Active,
            ActivityLevel::VeryActive,
        ] {
            assert_eq!(level.as_str().parse::<ActivityLevel>().unwrap(), level);
        }
        assert!("couch".parse::<WeightGoal>().is_err());
    }
}
