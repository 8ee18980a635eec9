//! 营养数据路由

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use fittrack_ports::NutritionFacts;
use serde::Deserialize;

use super::error::query_rejection;
use super::{ApiError, ApiResponse, ApiState};

pub(super) fn routes() -> Router<ApiState> {
    Router::new()
        .route("/search", get(search))
        .route("/details", get(details))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    pub fdc_id: u64,
}

async fn search(
    State(state): State<ApiState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<NutritionFacts>>>, ApiError> {
    let Query(query) = query.map_err(query_rejection)?;
    let results = state.nutrition.search(&query.query, query.limit).await?;
    Ok(ApiResponse::ok(results))
}

async fn details(
    State(state): State<ApiState>,
    query: Result<Query<DetailsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<NutritionFacts>>, ApiError> {
    let Query(query) = query.map_err(query_rejection)?;
    let facts = state.nutrition.details(query.fdc_id).await?;
    Ok(ApiResponse::ok(facts))
}
