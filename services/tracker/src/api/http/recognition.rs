//! AI 食物识别路由
//!
//! `save_log` 为真且同时给出 `user_id` 和 `meal_type` 时，识别结果写入饮食日志。

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::{HeaderMap, header};
use axum::routing::post;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use tower_http::limit::RequestBodyLimitLayer;

use super::error::{json_rejection, query_rejection};
use super::{ApiError, ApiResponse, ApiState, MAX_BODY_BYTES};
use crate::application::services::{MAX_IMAGE_BYTES, RecognizedMeal, SaveTarget};
use crate::domain::entities::MealType;

pub(super) fn routes() -> Router<ApiState> {
    let image = Router::new()
        .route("/image", post(recognize_image))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_IMAGE_BYTES));

    Router::new()
        .route("/text", post(recognize_text))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .merge(image)
}

#[derive(Debug, Default, Deserialize)]
pub struct SaveOptions {
    pub user_id: Option<String>,
    pub meal_type: Option<MealType>,
    #[serde(default)]
    pub save_log: bool,
    pub logged_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct RecognizeTextRequest {
    pub description: String,
    #[serde(flatten)]
    pub save: SaveOptions,
}

impl SaveOptions {
    async fn target(self, state: &ApiState) -> Result<Option<SaveTarget>, ApiError> {
        let (true, Some(user), Some(meal_type)) = (self.save_log, self.user_id, self.meal_type)
        else {
            return Ok(None);
        };

        let user_id = state.directory.resolve_identifier(&user).await?;
        Ok(Some(SaveTarget {
            user_id,
            meal_type,
            logged_date: self.logged_date.unwrap_or_else(fittrack_common::today),
        }))
    }
}

async fn recognize_image(
    State(state): State<ApiState>,
    headers: HeaderMap,
    options: Result<Query<SaveOptions>, QueryRejection>,
    body: Bytes,
) -> Result<Json<ApiResponse<RecognizedMeal>>, ApiError> {
    let Query(options) = options.map_err(query_rejection)?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(';').next().unwrap_or(value).trim().to_ascii_lowercase())
        .unwrap_or_default();

    let target = options.target(&state).await?;
    let meal = state
        .recognition
        .recognize_image(body.to_vec(), &content_type, target)
        .await?;
    Ok(ApiResponse::ok(meal))
}

async fn recognize_text(
    State(state): State<ApiState>,
    payload: Result<Json<RecognizeTextRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<RecognizedMeal>>, ApiError> {
    let Json(req) = payload.map_err(json_rejection)?;
    let target = req.save.target(&state).await?;
    let meal = state
        .recognition
        .recognize_text(&req.description, target)
        .await?;
    Ok(ApiResponse::ok(meal))
}
