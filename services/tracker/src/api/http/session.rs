//! 会话与当前用户路由
//!
//! 进程持有一个本地会话；`/me` 下的接口都通过共享的 `IdentityResolver` 得到当前用户。

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use fittrack_common::{SessionIdentity, UserId};
use fittrack_errors::AppError;
use fittrack_ports::AuthSessionPort;
use serde::{Deserialize, Serialize};
use tower_http::limit::RequestBodyLimitLayer;
use uuid::Uuid;

use super::error::{json_rejection, query_rejection};
use super::{ApiError, ApiResponse, ApiState, MAX_BODY_BYTES};
use crate::application::services::{BioProfileInput, MAX_IMAGE_BYTES};
use crate::domain::entities::{BioProfile, DailyProgress, Profile, ProgressPhoto, StepLog, WaterLog};

pub(super) fn session_routes() -> Router<ApiState> {
    Router::new()
        .route("/", post(sign_in).put(refresh).delete(sign_out))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}

pub(super) fn me_routes() -> Router<ApiState> {
    let photos = Router::new()
        .route("/photos", get(list_photos).post(upload_photo))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_IMAGE_BYTES));

    Router::new()
        .route("/", get(current_profile).patch(rename))
        .route("/bio-profile", get(bio_profile).put(save_bio_profile))
        .route("/progress", get(daily_progress))
        .route("/water", get(water).post(add_glass).delete(remove_glass))
        .route("/steps", get(steps).put(record_steps))
        .route("/photos/{id}", delete(delete_photo))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .merge(photos)
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub auth_id: String,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub auth_id: SessionIdentity,
    pub user_id: UserId,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub target_date: Option<NaiveDate>,
}

impl DateQuery {
    fn date(query: Result<Query<Self>, QueryRejection>) -> Result<NaiveDate, ApiError> {
        let Query(query) = query.map_err(query_rejection)?;
        Ok(query.target_date.unwrap_or_else(fittrack_common::today))
    }
}

#[derive(Debug, Deserialize)]
pub struct StepsRequest {
    pub steps: u32,
    pub target_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct PhotoQuery {
    pub filename: String,
    pub taken_on: Option<NaiveDate>,
}

fn parse_auth_id(raw: &str) -> Result<SessionIdentity, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::validation("auth_id must not be empty").into());
    }
    Ok(SessionIdentity::new(raw))
}

/// 登录：记录会话并立即解析内部用户 ID
async fn sign_in(
    State(state): State<ApiState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let Json(req) = payload.map_err(json_rejection)?;
    let auth_id = parse_auth_id(&req.auth_id)?;

    // 换用户登录前丢弃上一位用户的缓存
    if state.auth.local_session().is_some_and(|current| current != auth_id) {
        state.session.session.sign_out().await?;
    }
    state.auth.sign_in(auth_id.clone());
    let user_id = state.session.resolver.get_or_resolve().await?;
    Ok(ApiResponse::ok(SessionView { auth_id, user_id }))
}

/// 令牌刷新，不影响缓存的用户 ID
async fn refresh(
    State(state): State<ApiState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let Json(req) = payload.map_err(json_rejection)?;
    let auth_id = parse_auth_id(&req.auth_id)?;
    if state.auth.local_session().as_ref() != Some(&auth_id) {
        return Err(AppError::unauthenticated("No matching session to refresh").into());
    }

    state.auth.refresh(auth_id.clone());
    let user_id = state.session.resolver.get_or_resolve().await?;
    Ok(ApiResponse::ok(SessionView { auth_id, user_id }))
}

async fn sign_out(State(state): State<ApiState>) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.session.session.sign_out().await?;
    Ok(ApiResponse::ok(()))
}

async fn current_profile(
    State(state): State<ApiState>,
) -> Result<Json<ApiResponse<Profile>>, ApiError> {
    let profile = state.session.profiles.current_profile().await?;
    Ok(ApiResponse::ok(profile))
}

async fn rename(
    State(state): State<ApiState>,
    payload: Result<Json<RenameRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Profile>>, ApiError> {
    let Json(req) = payload.map_err(json_rejection)?;
    let profile = state
        .session
        .profiles
        .update_display_name(&req.display_name)
        .await?;
    Ok(ApiResponse::ok(profile))
}

async fn bio_profile(
    State(state): State<ApiState>,
) -> Result<Json<ApiResponse<BioProfile>>, ApiError> {
    let profile = state
        .session
        .bio_profiles
        .current()
        .await?
        .ok_or_else(|| AppError::not_found("Bio profile not found"))?;
    Ok(ApiResponse::ok(profile))
}

async fn save_bio_profile(
    State(state): State<ApiState>,
    payload: Result<Json<BioProfileInput>, JsonRejection>,
) -> Result<Json<ApiResponse<BioProfile>>, ApiError> {
    let Json(input) = payload.map_err(json_rejection)?;
    let profile = state.session.bio_profiles.save(input).await?;
    Ok(ApiResponse::ok(profile))
}

async fn daily_progress(
    State(state): State<ApiState>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<DailyProgress>>, ApiError> {
    let date = DateQuery::date(query)?;
    let progress = state.session.activity.daily_progress(date).await?;
    Ok(ApiResponse::ok(progress))
}

async fn water(
    State(state): State<ApiState>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<WaterLog>>, ApiError> {
    let date = DateQuery::date(query)?;
    Ok(ApiResponse::ok(state.session.activity.water_today(date).await?))
}

async fn add_glass(
    State(state): State<ApiState>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<WaterLog>>, ApiError> {
    let date = DateQuery::date(query)?;
    Ok(ApiResponse::ok(state.session.activity.add_glass(date).await?))
}

async fn remove_glass(
    State(state): State<ApiState>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<WaterLog>>, ApiError> {
    let date = DateQuery::date(query)?;
    Ok(ApiResponse::ok(state.session.activity.remove_glass(date).await?))
}

async fn steps(
    State(state): State<ApiState>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<StepLog>>, ApiError> {
    let date = DateQuery::date(query)?;
    Ok(ApiResponse::ok(state.session.activity.steps_for(date).await?))
}

async fn record_steps(
    State(state): State<ApiState>,
    payload: Result<Json<StepsRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<StepLog>>, ApiError> {
    let Json(req) = payload.map_err(json_rejection)?;
    let date = req.target_date.unwrap_or_else(fittrack_common::today);
    let log = state.session.activity.record_steps(date, req.steps).await?;
    Ok(ApiResponse::ok(log))
}

async fn list_photos(
    State(state): State<ApiState>,
) -> Result<Json<ApiResponse<Vec<ProgressPhoto>>>, ApiError> {
    Ok(ApiResponse::ok(state.session.photos.list().await?))
}

/// 请求体为图片原始字节，文件名放在查询参数里
async fn upload_photo(
    State(state): State<ApiState>,
    query: Result<Query<PhotoQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(query_rejection)?;
    let taken_on = query.taken_on.unwrap_or_else(fittrack_common::today);
    let photo = state
        .session
        .photos
        .upload(body.to_vec(), &query.filename, taken_on)
        .await?;

    Ok(match photo {
        Some(photo) => (StatusCode::CREATED, ApiResponse::ok(Some(photo))).into_response(),
        None => ApiResponse::ok(None::<ProgressPhoto>).into_response(),
    })
}

async fn delete_photo(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| AppError::validation(format!("Invalid photo id: {}", id)))?;
    state.session.photos.delete(id).await?;
    Ok(ApiResponse::ok(()))
}
