//! Detection HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{GetDetectionProgress, ResetDetection, StartDetection};
use crate::infrastructure::http::dto::{
    ApiResponse, ProgressResponse, StartDetectionRequest, StartDetectionResponseDto,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 开始检测批次
///
/// 默认立即返回初始快照，进度通过 /ws/events 推送；wait=true 时等待整批结束
pub async fn start_detection(
    State(state): State<Arc<AppState>>,
    body: Option<Json<StartDetectionRequest>>,
) -> Result<Json<ApiResponse<StartDetectionResponseDto>>, ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let command = StartDetection {
        file_ids: req.file_ids,
        wait: req.wait,
    };

    let response = state.start_detection_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(StartDetectionResponseDto {
        results: response.results,
        progress: ProgressResponse::new(response.generation, response.progress),
    })))
}

/// 获取当前批次进度
pub async fn detection_progress(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ProgressResponse>>, ApiError> {
    let response = state
        .get_detection_progress_handler
        .handle(GetDetectionProgress)
        .await?;
    Ok(Json(ApiResponse::success(ProgressResponse::new(
        response.generation,
        response.progress,
    ))))
}

/// 重置检测进度
pub async fn reset_detection(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ProgressResponse>>, ApiError> {
    let (generation, progress) = state.reset_detection_handler.handle(ResetDetection).await?;
    Ok(Json(ApiResponse::success(ProgressResponse::new(generation, progress))))
}
