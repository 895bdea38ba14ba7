//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                  GET   健康检查（含检测服务探测）
//! - /api/files/upload          POST  上传 DICOM 文件（multipart，可多个 file 字段）
//! - /api/files/list            GET   列出已注册文件
//! - /api/files/get             POST  获取文件详情
//! - /api/files/rename          POST  重命名文件
//! - /api/files/remove          POST  移除文件（同时重置检测）
//! - /api/files/clear           POST  清空文件（同时重置检测）
//! - /api/files/preview/:id     GET   PNG 预览
//! - /api/detection/start       POST  开始检测批次
//! - /api/detection/progress    GET   当前批次进度
//! - /api/detection/reset       POST  重置检测
//! - /api/report/generate       POST  生成诊断报告
//! - /ws/events                 WS    注册表事件 + 进度快照

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events", get(handlers::events_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/files", file_routes())
        .nest("/detection", detection_routes())
        .route("/report/generate", post(handlers::generate_report))
}

/// File 路由
fn file_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload", post(handlers::upload_files))
        .route("/list", get(handlers::list_files))
        .route("/get", post(handlers::get_file))
        .route("/rename", post(handlers::rename_file))
        .route("/remove", post(handlers::remove_file))
        .route("/clear", post(handlers::clear_files))
        .route("/preview/:id", get(handlers::preview_file))
}

/// Detection 路由
fn detection_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/start", post(handlers::start_detection))
        .route("/progress", get(handlers::detection_progress))
        .route("/reset", post(handlers::reset_detection))
}
