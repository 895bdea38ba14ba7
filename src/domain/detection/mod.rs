//! Detection Context - 检测限界上下文
//!
//! 职责:
//! - 检测 API 的数据结构（Detection / DicomMetadata / ImageInfo）
//! - 诊断报告结构
//! - 批次进度状态机（pending → loading → success | error）

mod progress;
mod report;
mod value_objects;

pub use progress::{DetectionProgress, FileDetectionState, FileStatus, ProgressError, Transition};
pub use report::{DiagnosticReport, DiagnosticReportRequest, DiagnosticReportResponse, SeverityLevel};
pub use value_objects::{
    class_counts, format_confidence, Detection, DetectionResponse, DetectionResult, DicomMetadata,
    ImageInfo,
};
