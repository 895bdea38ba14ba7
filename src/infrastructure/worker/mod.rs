//! Worker Layer - Background Task Processing
//!
//! 实现 DetectionTracker，并发执行每个文件的远程检测并跟踪进度

mod detection_tracker;

pub use detection_tracker::DetectionTracker;
