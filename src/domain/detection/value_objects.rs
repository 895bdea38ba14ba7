//! Detection Context - Value Objects

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单个检测框
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// 置信度 0..1
    pub confidence: f64,
    #[serde(rename = "class")]
    pub class_name: String,
    pub class_id: i64,
    pub detection_id: String,
}

/// DICOM 元数据（稀疏，缺失字段不序列化）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DicomMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_sex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer_model_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_spacing: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bits_allocated: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bits_stored: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photometric_interpretation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acquisition_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acquisition_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referring_physician_name: Option<String>,
}

/// 图像转换信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub original_shape: Vec<u64>,
    pub converted_format: String,
    pub converted_size: Vec<u64>,
    pub original_dtype: String,
    pub pixel_array_min: f64,
    pub pixel_array_max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photometric_interpretation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_syntax: Option<String>,
}

/// 检测 API 响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub predictions: Vec<Detection>,
    pub metadata: DicomMetadata,
    pub image_info: ImageInfo,
}

/// 单个文件的检测结果（带文件 ID 和文件名）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub file_id: String,
    pub file_name: String,
    #[serde(flatten)]
    pub response: DetectionResponse,
}

impl DetectionResult {
    pub fn new(
        file_id: impl Into<String>,
        file_name: impl Into<String>,
        response: DetectionResponse,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            file_name: file_name.into(),
            response,
        }
    }

    pub fn predictions(&self) -> &[Detection] {
        &self.response.predictions
    }
}

/// 置信度百分比，如 0.8734 -> "87.3%"
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

/// 按类别统计检测数量
pub fn class_counts(detections: &[Detection]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for detection in detections {
        *counts.entry(detection.class_name.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_class_field_name() {
        let json = r#"{"x":10.5,"y":20,"width":30,"height":40,"confidence":0.91,
            "class":"caries","class_id":0,"detection_id":"d-1"}"#;
        let detection: Detection = serde_json::from_str(json).unwrap();
        assert_eq!(detection.class_name, "caries");

        let value = serde_json::to_value(&detection).unwrap();
        assert_eq!(value["class"], "caries");
        assert!(value.get("class_name").is_none());
    }

    #[test]
    fn test_metadata_omits_absent_fields() {
        let metadata = DicomMetadata {
            modality: Some("IO".to_string()),
            rows: Some(1024),
            ..Default::default()
        };
        let value = serde_json::to_value(&metadata).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["modality"], "IO");
        assert!(!object.contains_key("patient_id"));
    }

    #[test]
    fn test_result_flattens_response() {
        let json = r#"{
            "file_id": "a.dcm-1", "file_name": "a.dcm",
            "predictions": [],
            "metadata": {"modality": "DX"},
            "image_info": {
                "original_shape": [512, 512], "converted_format": "JPEG",
                "converted_size": [512, 512], "original_dtype": "uint16",
                "pixel_array_min": 0, "pixel_array_max": 4095
            }
        }"#;
        let result: DetectionResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.file_id, "a.dcm-1");
        assert_eq!(result.response.metadata.modality.as_deref(), Some("DX"));
        assert_eq!(result.response.image_info.transfer_syntax, None);
    }

    #[test]
    fn test_summary_helpers() {
        assert_eq!(format_confidence(0.8734), "87.3%");

        let make = |class: &str| Detection {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            confidence: 0.5,
            class_name: class.to_string(),
            class_id: 0,
            detection_id: class.to_string(),
        };
        let counts = class_counts(&[make("caries"), make("lesion"), make("caries")]);
        assert_eq!(counts["caries"], 2);
        assert_eq!(counts["lesion"], 1);
    }
}
