//! Detection Engine Port - 远程检测服务抽象
//!
//! 每个文件一次调用，不存在批量接口；具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::domain::detection::DetectionResponse;
use crate::domain::dicom::RegisteredFile;

/// 检测错误
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 检测请求：原始 DICOM 字节（以 multipart 上传）
#[derive(Debug, Clone)]
pub struct DetectRequest {
    pub file_id: String,
    pub file_name: String,
    pub data: Bytes,
}

impl From<&RegisteredFile> for DetectRequest {
    fn from(file: &RegisteredFile) -> Self {
        Self {
            file_id: file.id.clone(),
            file_name: file.file_name.clone(),
            data: file.original.clone(),
        }
    }
}

/// Detection Engine Port
#[async_trait]
pub trait DetectionEnginePort: Send + Sync {
    /// 上传单个 DICOM 文件，返回检测框、元数据和图像信息
    async fn detect(&self, request: DetectRequest) -> Result<DetectionResponse, DetectionError>;

    /// 检查检测服务是否可用
    async fn health_check(&self) -> bool {
        true
    }
}
