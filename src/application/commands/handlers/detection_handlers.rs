//! Detection Command Handlers

use std::sync::Arc;

use crate::application::commands::{ResetDetection, StartDetection};
use crate::application::error::ApplicationError;
use crate::application::ports::{DetectionTrackerPort, FileRegistryPort};
use crate::domain::detection::{DetectionProgress, DetectionResult};
use crate::domain::dicom::RegisteredFile;

// ============================================================================
// StartDetection
// ============================================================================

/// 开始检测响应
#[derive(Debug, Clone)]
pub struct StartDetectionResponse {
    pub generation: u64,
    /// 等待模式下的成功结果（完成顺序）
    pub results: Option<Vec<DetectionResult>>,
    pub progress: DetectionProgress,
}

/// StartDetection Handler
pub struct StartDetectionHandler {
    registry: Arc<dyn FileRegistryPort>,
    tracker: Arc<dyn DetectionTrackerPort>,
}

impl StartDetectionHandler {
    pub fn new(registry: Arc<dyn FileRegistryPort>, tracker: Arc<dyn DetectionTrackerPort>) -> Self {
        Self { registry, tracker }
    }

    pub async fn handle(&self, command: StartDetection) -> Result<StartDetectionResponse, ApplicationError> {
        let files = self.resolve_files(command.file_ids)?;

        tracing::info!(
            file_count = files.len(),
            wait = command.wait,
            "Starting detection batch"
        );

        let handle = self.tracker.submit_batch(files);
        let generation = handle.generation();

        if command.wait {
            let results = handle.join().await;
            return Ok(StartDetectionResponse {
                generation,
                results: Some(results),
                progress: self.tracker.current_snapshot(),
            });
        }

        let progress = handle.initial().clone();
        handle.detach();

        Ok(StartDetectionResponse {
            generation,
            results: None,
            progress,
        })
    }

    /// 按请求顺序解析文件；未指定时使用注册表全部文件
    fn resolve_files(&self, file_ids: Option<Vec<String>>) -> Result<Vec<RegisteredFile>, ApplicationError> {
        match file_ids {
            None => Ok(self.registry.list()),
            Some(ids) => ids
                .iter()
                .map(|id| {
                    self.registry
                        .get(id)
                        .ok_or_else(|| ApplicationError::not_found("File", id))
                })
                .collect(),
        }
    }
}

// ============================================================================
// ResetDetection
// ============================================================================

/// ResetDetection Handler
pub struct ResetDetectionHandler {
    tracker: Arc<dyn DetectionTrackerPort>,
}

impl ResetDetectionHandler {
    pub fn new(tracker: Arc<dyn DetectionTrackerPort>) -> Self {
        Self { tracker }
    }

    /// 返回新的代数和空快照
    pub async fn handle(&self, _command: ResetDetection) -> Result<(u64, DetectionProgress), ApplicationError> {
        self.tracker.reset();
        Ok(self.tracker.snapshot_with_generation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    use crate::domain::detection::FileStatus;
    use crate::domain::dicom::RasterImage;
    use crate::infrastructure::adapters::{FakeDetectionClient, FakeDetectionClientConfig};
    use crate::infrastructure::events::EventPublisher;
    use crate::infrastructure::memory::InMemoryFileRegistry;
    use crate::infrastructure::worker::DetectionTracker;

    fn setup(latency_ms: u64) -> (Arc<InMemoryFileRegistry>, StartDetectionHandler, Arc<DetectionTracker>) {
        let registry = InMemoryFileRegistry::new().arc();
        for name in ["a.dcm", "b.dcm", "c.dcm"] {
            registry.add(RegisteredFile::new(
                name,
                Bytes::from_static(b"DICM"),
                RasterImage::new(1, 1, vec![0; 4]).unwrap(),
            ));
        }
        let engine = Arc::new(FakeDetectionClient::new(FakeDetectionClientConfig { latency_ms }));
        let tracker = DetectionTracker::new(engine, EventPublisher::new().arc()).arc();
        let handler = StartDetectionHandler::new(registry.clone(), tracker.clone());
        (registry, handler, tracker)
    }

    #[tokio::test]
    async fn test_start_all_files_and_wait() {
        let (registry, handler, _tracker) = setup(0);
        let response = handler
            .handle(StartDetection {
                file_ids: None,
                wait: true,
            })
            .await
            .unwrap();

        assert_eq!(response.results.as_ref().map(Vec::len), Some(3));
        assert!(response.progress.is_all_complete());
        let ids: Vec<_> = response.progress.files().iter().map(|f| f.file_id.clone()).collect();
        let expected: Vec<_> = registry.list().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_without_wait_returns_initial_snapshot() {
        let (registry, handler, tracker) = setup(100);
        let first = registry.list()[0].id.clone();

        let response = handler
            .handle(StartDetection {
                file_ids: Some(vec![first.clone()]),
                wait: false,
            })
            .await
            .unwrap();

        assert!(response.results.is_none());
        assert_eq!(response.progress.files().len(), 1);
        assert_eq!(response.progress.files()[0].status, FileStatus::Pending);
        assert!(!response.progress.is_all_complete());

        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        let snapshot = tracker.current_snapshot();
        assert_eq!(snapshot.files()[0].status, FileStatus::Success);
        assert!(snapshot.is_all_complete());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_start_without_wait_is_all_pending_on_multi_thread() {
        let registry = InMemoryFileRegistry::new().arc();
        for i in 0..50 {
            registry.add(RegisteredFile::new(
                format!("{}.dcm", i),
                Bytes::from_static(b"DICM"),
                RasterImage::new(1, 1, vec![0; 4]).unwrap(),
            ));
        }
        let engine = Arc::new(FakeDetectionClient::new(FakeDetectionClientConfig { latency_ms: 1000 }));
        let tracker = DetectionTracker::new(engine, EventPublisher::new().arc()).arc();
        let handler = StartDetectionHandler::new(registry, tracker.clone());

        for _ in 0..100 {
            let response = handler.handle(StartDetection::default()).await.unwrap();
            assert_eq!(response.progress.files().len(), 50);
            assert_eq!(response.progress.count(FileStatus::Pending), 50);
            assert!(response.progress.files().iter().all(|f| f.result.is_none()));
        }
        tracker.reset();
    }

    #[tokio::test]
    async fn test_unknown_file_id_starts_nothing() {
        let (_registry, handler, tracker) = setup(0);
        let err = handler
            .handle(StartDetection {
                file_ids: Some(vec!["missing".to_string()]),
                wait: true,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
        assert_eq!(tracker.snapshot_with_generation().0, 0);
    }

    #[tokio::test]
    async fn test_reset_returns_empty_snapshot() {
        let (_registry, handler, tracker) = setup(0);
        handler.handle(StartDetection::default()).await.unwrap();

        let (generation, progress) = ResetDetectionHandler::new(tracker)
            .handle(ResetDetection)
            .await
            .unwrap();
        assert_eq!(generation, 2);
        assert!(progress.is_empty());
        assert!(progress.is_all_complete());
    }
}
