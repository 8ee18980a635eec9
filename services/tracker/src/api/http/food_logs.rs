//! 饮食日志路由
//!
//! 路径中的用户标识可以是内部用户 ID，也可以是会话身份。

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use fittrack_errors::AppError;
use serde::Deserialize;
use uuid::Uuid;

use super::error::{json_rejection, query_rejection};
use super::{ApiError, ApiResponse, ApiState};
use crate::application::services::ManualFoodEntry;
use crate::domain::entities::{DailySummary, FoodItem, FoodLog, MealType};

pub(super) fn routes() -> Router<ApiState> {
    Router::new()
        .route("/", post(create_food_log))
        .route("/{id}", get(list_food_logs).delete(delete_food_log))
        .route("/detail/{id}", get(food_log_detail))
        .route("/summary/{id}", get(daily_summary))
}

#[derive(Debug, Deserialize)]
pub struct CreateFoodLogRequest {
    pub user_id: String,
    pub meal_type: MealType,
    pub logged_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub food_items: Vec<FoodItem>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(alias = "date")]
    pub target_date: Option<NaiveDate>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub target_date: Option<NaiveDate>,
}

async fn create_food_log(
    State(state): State<ApiState>,
    payload: Result<Json<CreateFoodLogRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<FoodLog>>), ApiError> {
    let Json(req) = payload.map_err(json_rejection)?;
    let user_id = state.directory.resolve_identifier(&req.user_id).await?;

    let log = state
        .food_logs
        .create_manual(ManualFoodEntry {
            user_id,
            meal_type: req.meal_type,
            logged_date: req.logged_date.unwrap_or_else(fittrack_common::today),
            notes: req.notes,
            food_items: req.food_items,
        })
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::ok(log)))
}

async fn list_food_logs(
    State(state): State<ApiState>,
    Path(user): Path<String>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<FoodLog>>>, ApiError> {
    let Query(query) = query.map_err(query_rejection)?;
    let user_id = state.directory.resolve_identifier(&user).await?;
    let logs = state
        .food_logs
        .list(&user_id, query.target_date, query.limit)
        .await?;
    Ok(ApiResponse::ok(logs))
}

async fn food_log_detail(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<FoodLog>>, ApiError> {
    let log = state.food_logs.detail(parse_log_id(&id)?).await?;
    Ok(ApiResponse::ok(log))
}

async fn daily_summary(
    State(state): State<ApiState>,
    Path(user): Path<String>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<DailySummary>>, ApiError> {
    let Query(query) = query.map_err(query_rejection)?;
    let user_id = state.directory.resolve_identifier(&user).await?;
    let date = query.target_date.unwrap_or_else(fittrack_common::today);
    let summary = state.food_logs.daily_summary(&user_id, date).await?;
    Ok(ApiResponse::ok(summary))
}

async fn delete_food_log(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.food_logs.delete(parse_log_id(&id)?).await?;
    Ok(ApiResponse::ok(()))
}

fn parse_log_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::validation(format!("Invalid food log id: {}", raw)))
}
