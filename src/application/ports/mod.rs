//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod detection_engine;
mod detection_tracker;
mod file_registry;
mod raster_decoder;
mod report_generator;

pub use detection_engine::{DetectRequest, DetectionEnginePort, DetectionError};
pub use detection_tracker::{BatchHandle, DetectionTrackerPort};
pub use file_registry::FileRegistryPort;
pub use raster_decoder::{DecodeError, RasterDecoderPort};
pub use report_generator::{ReportError, ReportGeneratorPort};
