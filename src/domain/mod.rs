//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Dicom Context: 已上传的 DICOM 文件与解码后的栅格图像
//! - Detection Context: 检测结果、诊断报告与批次进度状态机

pub mod detection;
pub mod dicom;
