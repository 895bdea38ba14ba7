//! File Command Handlers

use std::sync::Arc;

use crate::application::commands::{ClearFiles, RegisterFile, RemoveFile, RenameFile, UploadPolicy};
use crate::application::error::ApplicationError;
use crate::application::ports::{DetectionTrackerPort, FileRegistryPort, RasterDecoderPort};
use crate::domain::dicom::{FileUpdate, RegisteredFile};
use crate::infrastructure::events::EventPublisher;

// ============================================================================
// RegisterFile
// ============================================================================

/// RegisterFile Handler
///
/// 校验 → 解码为栅格 → 追加到注册表。解码失败的文件不会进入注册表
pub struct RegisterFileHandler {
    registry: Arc<dyn FileRegistryPort>,
    decoder: Arc<dyn RasterDecoderPort>,
    event_publisher: Arc<EventPublisher>,
    policy: UploadPolicy,
}

impl RegisterFileHandler {
    pub fn new(
        registry: Arc<dyn FileRegistryPort>,
        decoder: Arc<dyn RasterDecoderPort>,
        event_publisher: Arc<EventPublisher>,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            registry,
            decoder,
            event_publisher,
            policy,
        }
    }

    pub async fn handle(&self, command: RegisterFile) -> Result<RegisteredFile, ApplicationError> {
        self.policy
            .validate(&command.file_name, command.data.len() as u64)?;

        let raster = self.decoder.decode(command.data.clone()).await.map_err(|e| {
            tracing::warn!(file_name = %command.file_name, error = %e, "Failed to convert DICOM file");
            ApplicationError::from(e)
        })?;

        let file = RegisteredFile::new(command.file_name, command.data, raster);
        self.registry.add(file.clone());

        tracing::info!(
            file_id = %file.id,
            file_name = %file.file_name,
            width = file.raster_width(),
            height = file.raster_height(),
            size = file.file_size_bytes,
            "File registered"
        );
        self.event_publisher.publish_file_registered(
            &file.id,
            &file.file_name,
            file.raster_width(),
            file.raster_height(),
        );

        Ok(file)
    }
}

// ============================================================================
// RemoveFile
// ============================================================================

/// RemoveFile Handler
///
/// 文件集合变化后旧的检测结果不再对应，移除成功时同时重置检测进度
pub struct RemoveFileHandler {
    registry: Arc<dyn FileRegistryPort>,
    tracker: Arc<dyn DetectionTrackerPort>,
    event_publisher: Arc<EventPublisher>,
}

impl RemoveFileHandler {
    pub fn new(
        registry: Arc<dyn FileRegistryPort>,
        tracker: Arc<dyn DetectionTrackerPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            registry,
            tracker,
            event_publisher,
        }
    }

    /// 返回是否确实移除了文件；不存在的 ID 为空操作
    pub async fn handle(&self, command: RemoveFile) -> Result<bool, ApplicationError> {
        let Some(file) = self.registry.remove(&command.id) else {
            tracing::debug!(file_id = %command.id, "Remove ignored: file not registered");
            return Ok(false);
        };

        self.tracker.reset();

        tracing::info!(file_id = %file.id, file_name = %file.file_name, "File removed");
        self.event_publisher.publish_file_removed(&file.id);

        Ok(true)
    }
}

// ============================================================================
// ClearFiles
// ============================================================================

/// ClearFiles Handler
pub struct ClearFilesHandler {
    registry: Arc<dyn FileRegistryPort>,
    tracker: Arc<dyn DetectionTrackerPort>,
    event_publisher: Arc<EventPublisher>,
}

impl ClearFilesHandler {
    pub fn new(
        registry: Arc<dyn FileRegistryPort>,
        tracker: Arc<dyn DetectionTrackerPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            registry,
            tracker,
            event_publisher,
        }
    }

    /// 返回清除的文件数量
    pub async fn handle(&self, _command: ClearFiles) -> Result<usize, ApplicationError> {
        let count = self.registry.clear();
        self.tracker.reset();

        tracing::info!(count = count, "Files cleared");
        self.event_publisher.publish_files_cleared(count);

        Ok(count)
    }
}

// ============================================================================
// RenameFile
// ============================================================================

/// RenameFile Handler
pub struct RenameFileHandler {
    registry: Arc<dyn FileRegistryPort>,
    event_publisher: Arc<EventPublisher>,
}

impl RenameFileHandler {
    pub fn new(registry: Arc<dyn FileRegistryPort>, event_publisher: Arc<EventPublisher>) -> Self {
        Self {
            registry,
            event_publisher,
        }
    }

    pub async fn handle(&self, command: RenameFile) -> Result<RegisteredFile, ApplicationError> {
        let file_name = command.file_name.trim();
        if file_name.is_empty() {
            return Err(ApplicationError::validation("File name cannot be empty"));
        }

        let file = self
            .registry
            .update(&command.id, FileUpdate::rename(file_name))
            .ok_or_else(|| ApplicationError::not_found("File", &command.id))?;

        tracing::info!(file_id = %file.id, file_name = %file.file_name, "File renamed");
        self.event_publisher
            .publish_file_updated(&file.id, &file.file_name);

        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;

    use crate::application::ports::DecodeError;
    use crate::domain::dicom::RasterImage;
    use crate::infrastructure::adapters::{FakeDetectionClient, FakeDetectionClientConfig};
    use crate::infrastructure::memory::InMemoryFileRegistry;
    use crate::infrastructure::worker::DetectionTracker;

    struct StubDecoder;

    #[async_trait]
    impl RasterDecoderPort for StubDecoder {
        async fn decode(&self, data: Bytes) -> Result<RasterImage, DecodeError> {
            if data.starts_with(b"DICM") {
                Ok(RasterImage::new(4, 3, vec![0; 48]).unwrap())
            } else {
                Err(DecodeError::MissingPixelData)
            }
        }
    }

    struct Fixture {
        registry: Arc<InMemoryFileRegistry>,
        tracker: Arc<DetectionTracker>,
        publisher: Arc<EventPublisher>,
    }

    impl Fixture {
        fn new() -> Self {
            let publisher = EventPublisher::new().arc();
            let engine = Arc::new(FakeDetectionClient::new(FakeDetectionClientConfig { latency_ms: 0 }));
            Self {
                registry: InMemoryFileRegistry::new().arc(),
                tracker: DetectionTracker::new(engine, publisher.clone()).arc(),
                publisher,
            }
        }

        fn register_handler(&self) -> RegisterFileHandler {
            RegisterFileHandler::new(
                self.registry.clone(),
                Arc::new(StubDecoder),
                self.publisher.clone(),
                UploadPolicy::default(),
            )
        }

        async fn register(&self, name: &str) -> RegisteredFile {
            self.register_handler()
                .handle(RegisterFile {
                    file_name: name.to_string(),
                    data: Bytes::from_static(b"DICM...."),
                })
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn test_register_decodes_and_appends() {
        let fixture = Fixture::new();
        let mut events = fixture.publisher.subscribe();

        let file = fixture.register("left.dcm").await;
        assert!(file.id.starts_with("left.dcm-"));
        assert_eq!((file.raster_width(), file.raster_height()), (4, 3));
        assert_eq!(file.file_size_bytes, 8);
        assert_eq!(fixture.registry.len(), 1);
        assert!(events.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_register_rejects_before_registry() {
        let fixture = Fixture::new();
        let handler = fixture.register_handler();

        let err = handler
            .handle(RegisterFile {
                file_name: "scan.jpg".to_string(),
                data: Bytes::from_static(b"DICM...."),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let err = handler
            .handle(RegisterFile {
                file_name: "scan.dcm".to_string(),
                data: Bytes::from_static(b"garbage!"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::DecodeError(_)));

        assert!(fixture.registry.is_empty());
    }

    #[tokio::test]
    async fn test_remove_resets_detection() {
        let fixture = Fixture::new();
        let a = fixture.register("a.dcm").await;
        let b = fixture.register("b.dcm").await;

        let results = fixture.tracker.start_batch(fixture.registry.list()).await;
        assert_eq!(results.len(), 2);

        let handler = RemoveFileHandler::new(
            fixture.registry.clone(),
            fixture.tracker.clone(),
            fixture.publisher.clone(),
        );

        assert!(handler.handle(RemoveFile { id: a.id.clone() }).await.unwrap());
        assert!(fixture.tracker.current_snapshot().is_empty());
        assert_eq!(fixture.registry.list()[0].id, b.id);

        // 不存在的 ID 不重置
        fixture.tracker.start_batch(fixture.registry.list()).await;
        let (generation, _) = fixture.tracker.snapshot_with_generation();
        assert!(!handler.handle(RemoveFile { id: a.id }).await.unwrap());
        assert_eq!(fixture.tracker.snapshot_with_generation().0, generation);
        assert_eq!(fixture.tracker.current_snapshot().files().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_empties_registry_and_progress() {
        let fixture = Fixture::new();
        fixture.register("a.dcm").await;
        fixture.register("b.dcm").await;
        fixture.tracker.start_batch(fixture.registry.list()).await;

        let handler = ClearFilesHandler::new(
            fixture.registry.clone(),
            fixture.tracker.clone(),
            fixture.publisher.clone(),
        );
        assert_eq!(handler.handle(ClearFiles).await.unwrap(), 2);
        assert!(fixture.registry.is_empty());
        assert!(fixture.tracker.current_snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_rename() {
        let fixture = Fixture::new();
        let file = fixture.register("a.dcm").await;
        let handler = RenameFileHandler::new(fixture.registry.clone(), fixture.publisher.clone());

        let renamed = handler
            .handle(RenameFile {
                id: file.id.clone(),
                file_name: "  upper-left.dcm ".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(renamed.file_name, "upper-left.dcm");
        assert_eq!(renamed.id, file.id);

        let err = handler
            .handle(RenameFile {
                id: file.id.clone(),
                file_name: "   ".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let err = handler
            .handle(RenameFile {
                id: "missing".to_string(),
                file_name: "x.dcm".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }
}
