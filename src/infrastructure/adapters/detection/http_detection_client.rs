//! HTTP Detection Client - 调用远程检测 / 报告生成服务
//!
//! 实现 DetectionEnginePort 和 ReportGeneratorPort
//!
//! 远程 API:
//! POST {base_url}/detect-dicom                 multipart: file=<DICOM bytes>
//! POST {base_url}/generate-diagnostic-report   JSON: {predictions, metadata, image_info}
//! GET  {base_url}/health

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{
    DetectRequest, DetectionEnginePort, DetectionError, ReportError, ReportGeneratorPort,
};
use crate::domain::detection::{DetectionResponse, DiagnosticReportRequest, DiagnosticReportResponse};

/// 服务端错误体（FastAPI 风格）
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// HTTP 检测客户端配置
#[derive(Debug, Clone)]
pub struct HttpDetectionClientConfig {
    /// API 基础 URL（包含版本前缀）
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpDetectionClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v1".to_string(),
            timeout_secs: 120,
        }
    }
}

impl HttpDetectionClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// 传输层失败的归一化描述
#[derive(Debug)]
enum Failure {
    Network(String),
    Timeout,
    Service(String),
    InvalidResponse(String),
}

impl From<Failure> for DetectionError {
    fn from(f: Failure) -> Self {
        match f {
            Failure::Network(msg) => DetectionError::NetworkError(msg),
            Failure::Timeout => DetectionError::Timeout,
            Failure::Service(msg) => DetectionError::ServiceError(msg),
            Failure::InvalidResponse(msg) => DetectionError::InvalidResponse(msg),
        }
    }
}

impl From<Failure> for ReportError {
    fn from(f: Failure) -> Self {
        match f {
            Failure::Network(msg) => ReportError::NetworkError(msg),
            Failure::Timeout => ReportError::Timeout,
            Failure::Service(msg) => ReportError::ServiceError(msg),
            Failure::InvalidResponse(msg) => ReportError::InvalidResponse(msg),
        }
    }
}

/// HTTP 检测客户端
pub struct HttpDetectionClient {
    client: Client,
    config: HttpDetectionClientConfig,
}

impl HttpDetectionClient {
    /// 创建新的 HTTP 检测客户端
    pub fn new(config: HttpDetectionClientConfig) -> Result<Self, DetectionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DetectionError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn detect_url(&self) -> String {
        self.url("detect-dicom")
    }

    fn report_url(&self) -> String {
        self.url("generate-diagnostic-report")
    }

    fn health_url(&self) -> String {
        self.url("health")
    }

    /// 检查状态码并解析 JSON 响应体
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, Failure> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Failure::Service(format!(
                "HTTP {}: {}",
                status,
                error_detail(&body)
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Failure::InvalidResponse(e.to_string()))
    }
}

/// 将发送阶段的 reqwest 错误归类
fn classify(e: reqwest::Error) -> Failure {
    if e.is_timeout() {
        Failure::Timeout
    } else if e.is_connect() {
        Failure::Network(format!("Cannot connect to detection service: {}", e))
    } else {
        Failure::Network(e.to_string())
    }
}

/// 提取错误体中的 detail 字段，否则返回原始文本
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl DetectionEnginePort for HttpDetectionClient {
    async fn detect(&self, request: DetectRequest) -> Result<DetectionResponse, DetectionError> {
        tracing::debug!(
            url = %self.detect_url(),
            file_id = %request.file_id,
            size = request.data.len(),
            "Sending detection request"
        );

        let size = request.data.len() as u64;
        let part = multipart::Part::stream_with_length(request.data, size)
            .file_name(request.file_name.clone())
            .mime_str("application/dicom")
            .map_err(|e| DetectionError::NetworkError(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.detect_url())
            .multipart(form)
            .send()
            .await
            .map_err(classify)?;

        let detection: DetectionResponse = Self::read_json(response).await?;

        tracing::debug!(
            file_id = %request.file_id,
            detections = detection.predictions.len(),
            "Detection response received"
        );

        Ok(detection)
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl ReportGeneratorPort for HttpDetectionClient {
    async fn generate(
        &self,
        request: DiagnosticReportRequest,
    ) -> Result<DiagnosticReportResponse, ReportError> {
        tracing::debug!(
            url = %self.report_url(),
            detections = request.predictions.len(),
            "Sending diagnostic report request"
        );

        let response = self
            .client
            .post(self.report_url())
            .json(&request)
            .send()
            .await
            .map_err(classify)?;

        Ok(Self::read_json(response).await?)
    }
}
