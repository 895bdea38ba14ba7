//! File HTTP Handlers

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::application::{
    ClearFiles, FileSummary, GetFile, ListFiles, RegisterFile, RemoveFile, RenameFile,
};
use crate::infrastructure::adapters::encode_png;
use crate::infrastructure::http::dto::{
    ApiResponse, ClearFilesResponse, FileIdRequest, RemoveFileResponse, RenameFileRequest,
    UploadOutcome, UploadResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 上传 DICOM 文件（可重复的 file 字段）
///
/// 每个文件独立校验和解码，单个文件失败不影响其他文件
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, ApiError> {
    let mut outcomes = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;

        let command = RegisterFile {
            file_name: file_name.clone(),
            data,
        };
        let outcome = match state.register_file_handler.handle(command).await {
            Ok(file) => UploadOutcome::success(FileSummary::from(&file)),
            Err(e) => UploadOutcome::failure(file_name, e.to_string()),
        };
        outcomes.push(outcome);
    }

    if outcomes.is_empty() {
        return Err(ApiError::BadRequest("At least one file is required".to_string()));
    }

    let registered = outcomes.iter().filter(|o| o.file.is_some()).count();
    tracing::info!(
        registered = registered,
        failed = outcomes.len() - registered,
        "Upload processed"
    );

    Ok(Json(ApiResponse::success(UploadResponse {
        registered,
        failed: outcomes.len() - registered,
        files: outcomes,
    })))
}

/// 获取文件列表（注册顺序）
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<FileSummary>>>, ApiError> {
    let files = state.list_files_handler.handle(ListFiles).await?;
    Ok(Json(ApiResponse::success(files)))
}

/// 获取文件详情
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FileIdRequest>,
) -> Result<Json<ApiResponse<FileSummary>>, ApiError> {
    let file = state.get_file_handler.handle(GetFile { id: req.id }).await?;
    Ok(Json(ApiResponse::success(FileSummary::from(&file))))
}

/// 重命名文件
pub async fn rename_file(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenameFileRequest>,
) -> Result<Json<ApiResponse<FileSummary>>, ApiError> {
    let command = RenameFile {
        id: req.id,
        file_name: req.file_name,
    };
    let file = state.rename_file_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(FileSummary::from(&file))))
}

/// 移除文件（不存在时为空操作）
pub async fn remove_file(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FileIdRequest>,
) -> Result<Json<ApiResponse<RemoveFileResponse>>, ApiError> {
    let removed = state.remove_file_handler.handle(RemoveFile { id: req.id }).await?;
    Ok(Json(ApiResponse::success(RemoveFileResponse { removed })))
}

/// 清空所有文件
pub async fn clear_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ClearFilesResponse>>, ApiError> {
    let count = state.clear_files_handler.handle(ClearFiles).await?;
    Ok(Json(ApiResponse::success(ClearFilesResponse { count })))
}

/// 预览解码后的栅格（PNG）
pub async fn preview_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let file = state.get_file_handler.handle(GetFile { id }).await?;

    let raster = file.raster.clone();
    let png = tokio::task::spawn_blocking(move || encode_png(&raster))
        .await
        .map_err(|e| ApiError::Internal(format!("Preview task failed: {}", e)))?
        .map_err(|e| ApiError::Internal(format!("Failed to encode preview: {}", e)))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CONTENT_LENGTH, png.len())
        .body(Body::from(png))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}
