//! 饮食日志实体

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use fittrack_common::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 餐次
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            "snack" => Ok(Self::Snack),
            other => Err(format!("Unknown meal type: {}", other)),
        }
    }
}

/// 营养合计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl NutritionTotals {
    pub fn add(&mut self, other: &NutritionTotals) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.carbs += other.carbs;
        self.fat += other.fat;
    }
}

/// 单个食物条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub food_name: String,
    #[serde(default)]
    pub serving_size: Option<String>,
    #[serde(flatten)]
    pub nutrition: NutritionTotals,
}

/// 饮食日志
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLog {
    pub id: Uuid,
    pub user_id: UserId,
    pub image_url: Option<String>,
    pub meal_type: MealType,
    pub logged_date: NaiveDate,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub totals: NutritionTotals,
    pub ai_confidence: Option<f64>,
    #[serde(default)]
    pub food_items: Vec<FoodItem>,
    pub created_at: DateTime<Utc>,
}

impl FoodLog {
    /// 手动录入，合计由条目求和
    pub fn manual(
        user_id: UserId,
        meal_type: MealType,
        logged_date: NaiveDate,
        notes: Option<String>,
        food_items: Vec<FoodItem>,
    ) -> Self {
        Self::build(user_id, meal_type, logged_date, notes, food_items)
    }

    /// AI 识别结果，置信度限制在 0-100
    pub fn recognized(
        user_id: UserId,
        meal_type: MealType,
        logged_date: NaiveDate,
        notes: Option<String>,
        food_items: Vec<FoodItem>,
        ai_confidence: f64,
        image_url: Option<String>,
    ) -> Self {
        let confidence = if ai_confidence.is_finite() {
            ai_confidence.clamp(0.0, 100.0)
        } else {
            0.0
        };

        Self {
            image_url,
            ai_confidence: Some(confidence),
            ..Self::build(user_id, meal_type, logged_date, notes, food_items)
        }
    }

    fn build(
        user_id: UserId,
        meal_type: MealType,
        logged_date: NaiveDate,
        notes: Option<String>,
        food_items: Vec<FoodItem>,
    ) -> Self {
        let mut totals = NutritionTotals::default();
        for item in &food_items {
            totals.add(&item.nutrition);
        }

        Self {
            id: fittrack_common::new_id(),
            user_id,
            image_url: None,
            meal_type,
            logged_date,
            notes,
            totals,
            ai_confidence: None,
            food_items,
            created_at: Utc::now(),
        }
    }

    pub fn is_ai_sourced(&self) -> bool {
        self.ai_confidence.is_some()
    }
}

/// 单个餐次的汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MealBreakdown {
    pub count: u32,
    #[serde(flatten)]
    pub totals: NutritionTotals,
}

/// 每日营养汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub totals: NutritionTotals,
    pub meal_count: u32,
    pub meals_by_type: BTreeMap<MealType, MealBreakdown>,
}

impl DailySummary {
    pub fn from_logs(date: NaiveDate, logs: &[FoodLog]) -> Self {
        let mut totals = NutritionTotals::default();
        let mut meals_by_type: BTreeMap<MealType, MealBreakdown> = BTreeMap::new();

        for log in logs {
            totals.add(&log.totals);
            let meal = meals_by_type.entry(log.meal_type).or_default();
            meal.count += 1;
            meal.totals.add(&log.totals);
        }

        Self {
            date,
            totals,
            meal_count: logs.len() as u32,
            meals_by_type,
        }
    }
}
