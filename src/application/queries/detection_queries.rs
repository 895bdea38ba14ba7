//! Detection Queries

/// 获取当前检测进度快照
#[derive(Debug, Clone)]
pub struct GetDetectionProgress;
