//! Detection Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::DetectionTrackerPort;
use crate::application::queries::GetDetectionProgress;
use crate::domain::detection::DetectionProgress;

/// 进度响应
#[derive(Debug, Clone)]
pub struct DetectionProgressResponse {
    pub generation: u64,
    pub progress: DetectionProgress,
}

/// GetDetectionProgress Handler
pub struct GetDetectionProgressHandler {
    tracker: Arc<dyn DetectionTrackerPort>,
}

impl GetDetectionProgressHandler {
    pub fn new(tracker: Arc<dyn DetectionTrackerPort>) -> Self {
        Self { tracker }
    }

    pub async fn handle(&self, _query: GetDetectionProgress) -> Result<DetectionProgressResponse, ApplicationError> {
        let (generation, progress) = self.tracker.snapshot_with_generation();
        Ok(DetectionProgressResponse {
            generation,
            progress,
        })
    }
}
