//! 营养数据查询服务

use std::sync::Arc;

use fittrack_errors::{AppError, AppResult};
use fittrack_ports::{NutritionFacts, NutritionSearchPort};
use tracing::debug;

pub const DEFAULT_SEARCH_LIMIT: u32 = 5;
pub const MAX_SEARCH_LIMIT: u32 = 25;
const MIN_QUERY_CHARS: usize = 2;

pub struct NutritionService {
    source: Arc<dyn NutritionSearchPort>,
}

impl NutritionService {
    pub fn new(source: Arc<dyn NutritionSearchPort>) -> Self {
        Self { source }
    }

    /// 按名称搜索；没有结果时返回 NotFound
    pub async fn search(&self, query: &str, limit: Option<u32>) -> AppResult<Vec<NutritionFacts>> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Err(AppError::validation(format!(
                "query must be at least {} characters",
                MIN_QUERY_CHARS
            )));
        }
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
            return Err(AppError::validation(format!(
                "limit must be between 1 and {}",
                MAX_SEARCH_LIMIT
            )));
        }

        let results = self.source.search(query, limit).await?;
        debug!(query, results = results.len(), "Nutrition search");
        if results.is_empty() {
            return Err(AppError::not_found(
                "No nutrition data found. Try a different search term, or check that the USDA API key is set.",
            ));
        }
        Ok(results)
    }

    pub async fn details(&self, food_id: u64) -> AppResult<NutritionFacts> {
        self.source
            .details(food_id)
            .await?
            .ok_or_else(|| AppError::not_found("Food not found"))
    }
}
