//! Detection Context - 诊断报告

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::{Detection, DetectionResponse, DicomMetadata, ImageInfo};

/// 严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLevel {
    Low,
    Moderate,
    High,
}

impl SeverityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Low => "low",
            SeverityLevel::Moderate => "moderate",
            SeverityLevel::High => "high",
        }
    }
}

/// AI 生成的诊断报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub report: String,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub severity_level: SeverityLevel,
    #[serde(with = "timestamp")]
    pub generated_at: DateTime<Utc>,
}

/// 时间戳兼容：RFC 3339，或不带时区的 ISO 8601（按 UTC 处理）
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| D::Error::custom(format!("invalid timestamp {:?}: {}", raw, e)))
    }
}

/// 报告生成请求
///
/// metadata / image_info 缺失时序列化为 null
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReportRequest {
    pub predictions: Vec<Detection>,
    pub metadata: Option<DicomMetadata>,
    pub image_info: Option<ImageInfo>,
}

impl From<DetectionResponse> for DiagnosticReportRequest {
    fn from(response: DetectionResponse) -> Self {
        Self {
            predictions: response.predictions,
            metadata: Some(response.metadata),
            image_info: Some(response.image_info),
        }
    }
}

/// 报告生成响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReportResponse {
    pub diagnostic_report: DiagnosticReport,
    pub detections_used: Vec<Detection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DicomMetadata>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_response() {
        let json = r#"{
            "diagnostic_report": {
                "report": "Two carious lesions detected.",
                "summary": "Caries on 36 and 46.",
                "recommendations": ["Restoration", "Follow-up in 6 months"],
                "severity_level": "moderate",
                "generated_at": "2025-06-01T10:30:00Z"
            },
            "detections_used": []
        }"#;
        let response: DiagnosticReportResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.diagnostic_report.severity_level,
            SeverityLevel::Moderate
        );
        assert_eq!(response.diagnostic_report.recommendations.len(), 2);
        assert!(response.metadata.is_none());
    }

    #[test]
    fn test_naive_timestamp_treated_as_utc() {
        let json = r#"{"report":"r","summary":"s","recommendations":[],
            "severity_level":"low","generated_at":"2025-06-01T10:30:00.123456"}"#;
        let report: DiagnosticReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.generated_at.to_rfc3339(), "2025-06-01T10:30:00.123456+00:00");
    }

    #[test]
    fn test_unknown_severity_rejected() {
        let json = r#"{"report":"r","summary":"s","recommendations":[],
            "severity_level":"critical","generated_at":"2025-06-01T10:30:00Z"}"#;
        assert!(serde_json::from_str::<DiagnosticReport>(json).is_err());
    }

    #[test]
    fn test_request_serializes_missing_parts_as_null() {
        let request = DiagnosticReportRequest {
            predictions: vec![],
            metadata: None,
            image_info: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value["metadata"].is_null());
        assert!(value["image_info"].is_null());
    }
}
