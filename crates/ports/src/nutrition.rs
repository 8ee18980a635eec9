//! 营养数据与食物识别 trait 定义

use async_trait::async_trait;
use fittrack_errors::AppResult;
use serde::{Deserialize, Serialize};

/// 营养数据库中的一条食物
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub food_name: String,
    pub serving_size: Option<String>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// 数据来源，例如 `usda`
    pub source: String,
}

/// 营养数据库查询
#[async_trait]
pub trait NutritionSearchPort: Send + Sync {
    /// 按名称搜索，最多返回 `limit` 条
    async fn search(&self, query: &str, limit: u32) -> AppResult<Vec<NutritionFacts>>;

    /// 按数据库 ID 查询单条
    async fn details(&self, food_id: u64) -> AppResult<Option<NutritionFacts>>;
}

/// 识别出的单个食物
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedFood {
    pub food_name: String,
    pub serving_size: Option<String>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub confidence: f64,
}

/// 一次识别的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    pub food_items: Vec<RecognizedFood>,
    /// 整体置信度 0-100
    pub ai_confidence: f64,
}

/// 图片或文字描述 -> 营养估算
#[async_trait]
pub trait FoodRecognitionPort: Send + Sync {
    async fn analyze_image(&self, image: &[u8], mime_type: &str) -> AppResult<Recognition>;

    async fn analyze_text(&self, description: &str) -> AppResult<Recognition>;
}
