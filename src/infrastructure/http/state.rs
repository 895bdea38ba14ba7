//! Application State
//!
//! 包含所有端口和 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    ClearFilesHandler, GenerateReportHandler, RegisterFileHandler, RemoveFileHandler,
    RenameFileHandler, ResetDetectionHandler, StartDetectionHandler,
    // Query handlers
    GetDetectionProgressHandler, GetFileHandler, ListFilesHandler,
    // Ports
    DetectionEnginePort, DetectionTrackerPort, FileRegistryPort, RasterDecoderPort,
    ReportGeneratorPort, UploadPolicy,
};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub registry: Arc<dyn FileRegistryPort>,
    pub tracker: Arc<dyn DetectionTrackerPort>,
    pub detection_engine: Arc<dyn DetectionEnginePort>,
    pub event_publisher: Arc<EventPublisher>,

    // ========== Command Handlers ==========
    pub register_file_handler: RegisterFileHandler,
    pub remove_file_handler: RemoveFileHandler,
    pub clear_files_handler: ClearFilesHandler,
    pub rename_file_handler: RenameFileHandler,
    pub start_detection_handler: StartDetectionHandler,
    pub reset_detection_handler: ResetDetectionHandler,
    pub generate_report_handler: GenerateReportHandler,

    // ========== Query Handlers ==========
    pub list_files_handler: ListFilesHandler,
    pub get_file_handler: GetFileHandler,
    pub get_detection_progress_handler: GetDetectionProgressHandler,
}

impl AppState {
    /// 创建应用状态
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<dyn FileRegistryPort>,
        tracker: Arc<dyn DetectionTrackerPort>,
        decoder: Arc<dyn RasterDecoderPort>,
        detection_engine: Arc<dyn DetectionEnginePort>,
        report_generator: Arc<dyn ReportGeneratorPort>,
        event_publisher: Arc<EventPublisher>,
        upload_policy: UploadPolicy,
    ) -> Self {
        Self {
            // Ports
            registry: registry.clone(),
            tracker: tracker.clone(),
            detection_engine,
            event_publisher: event_publisher.clone(),

            // Command handlers
            register_file_handler: RegisterFileHandler::new(
                registry.clone(),
                decoder,
                event_publisher.clone(),
                upload_policy,
            ),
            remove_file_handler: RemoveFileHandler::new(
                registry.clone(),
                tracker.clone(),
                event_publisher.clone(),
            ),
            clear_files_handler: ClearFilesHandler::new(
                registry.clone(),
                tracker.clone(),
                event_publisher.clone(),
            ),
            rename_file_handler: RenameFileHandler::new(registry.clone(), event_publisher),
            start_detection_handler: StartDetectionHandler::new(registry.clone(), tracker.clone()),
            reset_detection_handler: ResetDetectionHandler::new(tracker.clone()),
            generate_report_handler: GenerateReportHandler::new(tracker.clone(), report_generator),

            // Query handlers
            list_files_handler: ListFilesHandler::new(registry.clone()),
            get_file_handler: GetFileHandler::new(registry),
            get_detection_progress_handler: GetDetectionProgressHandler::new(tracker),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;

    use crate::application::DecodeError;
    use crate::domain::dicom::RasterImage;
    use crate::infrastructure::adapters::{FakeDetectionClient, FakeDetectionClientConfig};
    use crate::infrastructure::memory::InMemoryFileRegistry;
    use crate::infrastructure::worker::DetectionTracker;

    /// 以 "DICM" 开头的数据解码为 2x2 栅格，其余视为非法
    pub struct StubDecoder;

    #[async_trait]
    impl RasterDecoderPort for StubDecoder {
        async fn decode(&self, data: Bytes) -> Result<RasterImage, DecodeError> {
            if data.starts_with(b"DICM") {
                Ok(RasterImage::new(2, 2, vec![128; 16]).unwrap())
            } else {
                Err(DecodeError::InvalidDicom("missing DICM magic".to_string()))
            }
        }
    }

    /// 内存注册表 + 零延迟 fake 检测服务
    pub fn test_state() -> AppState {
        let publisher = EventPublisher::new().arc();
        let client = Arc::new(FakeDetectionClient::new(FakeDetectionClientConfig {
            latency_ms: 0,
        }));
        let tracker = DetectionTracker::new(client.clone(), publisher.clone()).arc();
        AppState::new(
            InMemoryFileRegistry::new().arc(),
            tracker,
            Arc::new(StubDecoder),
            client.clone(),
            client,
            publisher,
            UploadPolicy::default(),
        )
    }
}
