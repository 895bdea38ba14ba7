//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::application::FileSummary;
use crate::domain::detection::{DetectionProgress, DetectionResult, FileStatus};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// File DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FileIdRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameFileRequest {
    pub id: String,
    pub file_name: String,
}

/// 单个上传文件的处理结果
#[derive(Debug, Serialize)]
pub struct UploadOutcome {
    pub file_name: String,
    /// "success" | "error"
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadOutcome {
    pub fn success(file: FileSummary) -> Self {
        Self {
            file_name: file.file_name.clone(),
            status: "success",
            file: Some(file),
            error: None,
        }
    }

    pub fn failure(file_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            status: "error",
            file: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub registered: usize,
    pub failed: usize,
    pub files: Vec<UploadOutcome>,
}

#[derive(Debug, Serialize)]
pub struct RemoveFileResponse {
    pub removed: bool,
}

#[derive(Debug, Serialize)]
pub struct ClearFilesResponse {
    pub count: usize,
}

// ============================================================================
// Detection DTOs
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct StartDetectionRequest {
    #[serde(default)]
    pub file_ids: Option<Vec<String>>,
    #[serde(default)]
    pub wait: bool,
}

/// 各状态的条目数量
#[derive(Debug, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub loading: usize,
    pub success: usize,
    pub error: usize,
}

impl From<&DetectionProgress> for StatusCounts {
    fn from(progress: &DetectionProgress) -> Self {
        Self {
            pending: progress.count(FileStatus::Pending),
            loading: progress.count(FileStatus::Loading),
            success: progress.count(FileStatus::Success),
            error: progress.count(FileStatus::Error),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub generation: u64,
    pub counts: StatusCounts,
    #[serde(flatten)]
    pub progress: DetectionProgress,
}

impl ProgressResponse {
    pub fn new(generation: u64, progress: DetectionProgress) -> Self {
        Self {
            generation,
            counts: StatusCounts::from(&progress),
            progress,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StartDetectionResponseDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<DetectionResult>>,
    #[serde(flatten)]
    pub progress: ProgressResponse,
}

// ============================================================================
// Report DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    pub file_id: String,
}
