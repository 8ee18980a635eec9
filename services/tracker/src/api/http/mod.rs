//! HTTP 接口

mod error;
mod food_logs;
mod health;
mod middleware;
mod nutrition;
mod recognition;
mod session;

pub use error::{ApiError, ApiResponse};

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::application::context::SessionServices;
use crate::application::services::{FoodLogService, NutritionService, RecognitionService};
use crate::identity::UserDirectory;
use crate::infrastructure::auth::LocalSessionStore;

/// JSON 请求体上限，图片上传路由单独放宽
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// 路由共享状态
#[derive(Clone)]
pub struct ApiState {
    pub directory: Arc<UserDirectory>,
    pub food_logs: Arc<FoodLogService>,
    pub nutrition: Arc<NutritionService>,
    pub recognition: Arc<RecognitionService>,
    /// 本进程的登录会话
    pub auth: Arc<LocalSessionStore>,
    pub session: Arc<SessionServices>,
    /// 本地对象存储根目录，配置后在 `/uploads` 下提供静态访问
    pub uploads_dir: Option<PathBuf>,
    pub pool: Option<PgPool>,
    pub metrics: Option<PrometheusHandle>,
}

/// 构建完整路由
pub fn router(state: ApiState, cors_origins: &[String]) -> Router {
    let mut app = Router::new();
    if let Some(dir) = &state.uploads_dir {
        app = app.nest_service("/uploads", ServeDir::new(dir));
    }

    app.merge(health::routes())
        .nest(
            "/api/v1/food-logs",
            food_logs::routes().layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        )
        .nest("/api/v1/nutrition", nutrition::routes())
        .nest("/api/v1/recognize", recognition::routes())
        .nest("/api/v1/session", session::session_routes())
        .nest("/api/v1/me", session::me_routes())
        .route_layer(axum::middleware::from_fn(middleware::track_metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
