//! Detection Adapter - 远程检测与报告生成客户端

mod fake_detection_client;
mod http_detection_client;

pub use fake_detection_client::{FakeDetectionClient, FakeDetectionClientConfig};
pub use http_detection_client::{HttpDetectionClient, HttpDetectionClientConfig};
