//! 中间件

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use fittrack_telemetry::record_http_request;

/// 按路由模板记录请求计数
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let method = request.method().to_string();

    let response = next.run(request).await;
    record_http_request(&route, &method, response.status().as_u16());
    response
}
