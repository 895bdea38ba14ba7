//! Report Generator Port - 诊断报告生成抽象
//!
//! 单次远程调用，与检测批次互不协调

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::detection::{DiagnosticReportRequest, DiagnosticReportResponse};

/// 报告生成错误
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Report Generator Port
#[async_trait]
pub trait ReportGeneratorPort: Send + Sync {
    /// 根据检测结果生成诊断报告
    async fn generate(
        &self,
        request: DiagnosticReportRequest,
    ) -> Result<DiagnosticReportResponse, ReportError>;
}
