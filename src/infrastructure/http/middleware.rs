//! HTTP Middleware
//!
//! 传输层错误日志（业务错误以 HTTP 200 + errno 返回，在 ApiError 中记录）

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// 记录 4xx / 5xx 响应及其耗时
///
/// 典型场景：未知路由、JSON / multipart 解析失败、请求体超过上限
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms = elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms = elapsed_ms,
            "HTTP client error"
        );
    }

    response
}
