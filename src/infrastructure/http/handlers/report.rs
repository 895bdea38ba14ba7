//! Report HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::GenerateReport;
use crate::domain::detection::DiagnosticReportResponse;
use crate::infrastructure::http::dto::{ApiResponse, GenerateReportRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 为检测成功的文件生成诊断报告
pub async fn generate_report(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateReportRequest>,
) -> Result<Json<ApiResponse<DiagnosticReportResponse>>, ApiError> {
    let report = state
        .generate_report_handler
        .handle(GenerateReport {
            file_id: req.file_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(report)))
}
