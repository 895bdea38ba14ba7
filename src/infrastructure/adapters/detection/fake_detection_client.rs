//! Fake Detection Client - 不调用远程服务的检测 / 报告客户端
//!
//! 用于本地开发和测试：返回固定的检测框，报告按检测数量给出严重程度

use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;

use crate::application::ports::{
    DetectRequest, DetectionEnginePort, DetectionError, ReportError, ReportGeneratorPort,
};
use crate::domain::detection::{
    class_counts, format_confidence, Detection, DetectionResponse, DiagnosticReport, DiagnosticReportRequest,
    DiagnosticReportResponse, DicomMetadata, ImageInfo, SeverityLevel,
};

/// Fake Detection Client 配置
#[derive(Debug, Clone)]
pub struct FakeDetectionClientConfig {
    /// 模拟的请求延迟（毫秒）
    pub latency_ms: u64,
}

impl Default for FakeDetectionClientConfig {
    fn default() -> Self {
        Self { latency_ms: 200 }
    }
}

/// Fake Detection Client
pub struct FakeDetectionClient {
    config: FakeDetectionClientConfig,
}

impl FakeDetectionClient {
    pub fn new(config: FakeDetectionClientConfig) -> Self {
        tracing::info!(latency_ms = config.latency_ms, "FakeDetectionClient initialized");
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeDetectionClientConfig::default())
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }
    }

    fn canned_predictions(file_id: &str) -> Vec<Detection> {
        [
            (412.0, 288.0, 96.0, 110.0, 0.91, "caries", 0),
            (640.5, 301.0, 88.0, 102.0, 0.78, "caries", 0),
            (205.0, 350.0, 140.0, 160.0, 0.66, "periapical_lesion", 2),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (x, y, width, height, confidence, class_name, class_id))| Detection {
            x,
            y,
            width,
            height,
            confidence,
            class_name: class_name.to_string(),
            class_id,
            detection_id: format!("{}-det-{}", file_id, i),
        })
        .collect()
    }
}

fn severity_for(count: usize) -> SeverityLevel {
    match count {
        0 => SeverityLevel::Low,
        1..=3 => SeverityLevel::Moderate,
        _ => SeverityLevel::High,
    }
}

#[async_trait]
impl DetectionEnginePort for FakeDetectionClient {
    async fn detect(&self, request: DetectRequest) -> Result<DetectionResponse, DetectionError> {
        tracing::debug!(
            file_id = %request.file_id,
            size = request.data.len(),
            "FakeDetectionClient: returning canned predictions"
        );

        self.simulate_latency().await;

        Ok(DetectionResponse {
            predictions: Self::canned_predictions(&request.file_id),
            metadata: DicomMetadata {
                modality: Some("IO".to_string()),
                manufacturer: Some("Fake".to_string()),
                ..Default::default()
            },
            image_info: ImageInfo {
                original_shape: vec![1024, 1280],
                converted_format: "JPEG".to_string(),
                converted_size: vec![1280, 1024],
                original_dtype: "uint16".to_string(),
                pixel_array_min: 0.0,
                pixel_array_max: 4095.0,
                photometric_interpretation: Some("MONOCHROME2".to_string()),
                transfer_syntax: None,
            },
        })
    }
}

#[async_trait]
impl ReportGeneratorPort for FakeDetectionClient {
    async fn generate(
        &self,
        request: DiagnosticReportRequest,
    ) -> Result<DiagnosticReportResponse, ReportError> {
        self.simulate_latency().await;

        let counts = class_counts(&request.predictions);
        let findings: Vec<String> = counts
            .iter()
            .map(|(class_name, n)| format!("{} x{}", class_name, n))
            .collect();
        let summary = if findings.is_empty() {
            "No findings.".to_string()
        } else {
            format!("Findings: {}.", findings.join(", "))
        };

        Ok(DiagnosticReportResponse {
            diagnostic_report: DiagnosticReport {
                report: request
                    .predictions
                    .iter()
                    .map(|d| format!("{} ({})", d.class_name, format_confidence(d.confidence)))
                    .fold(
                        format!("{} region(s) of interest detected.", request.predictions.len()),
                        |acc, line| format!("{}\n- {}", acc, line),
                    ),
                summary,
                recommendations: counts
                    .keys()
                    .map(|class_name| format!("Clinical examination of {}", class_name))
                    .collect(),
                severity_level: severity_for(request.predictions.len()),
                generated_at: Utc::now(),
            },
            detections_used: request.predictions,
            metadata: request.metadata,
        })
    }
}
