//! Detection Tracker - 多文件检测进度跟踪
//!
//! 每个批次分配一个递增的 generation。所有状态迁移都经过 `transition`：
//! 持有同一把锁完成代号检查、状态迁移、标志重算和快照发布，
//! 因此观察者看到的快照顺序与迁移顺序一致，且不会看到半更新的快照。
//! reset / 新批次之后才完成的请求因代号不匹配被丢弃。
//!
//! 请求全部同时发出，不限流。

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinSet;

use crate::application::ports::{
    BatchHandle, DetectRequest, DetectionEnginePort, DetectionTrackerPort,
};
use crate::domain::detection::{DetectionProgress, DetectionResult, Transition};
use crate::domain::dicom::RegisteredFile;
use crate::infrastructure::events::EventPublisher;

/// 跟踪器状态
struct TrackerState {
    generation: u64,
    progress: DetectionProgress,
}

struct Shared {
    state: Mutex<TrackerState>,
    engine: Arc<dyn DetectionEnginePort>,
    event_publisher: Arc<EventPublisher>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 唯一的状态迁移入口，返回迁移是否生效
    fn transition(&self, generation: u64, index: usize, transition: Transition) -> bool {
        let mut state = self.lock();

        if state.generation != generation {
            tracing::debug!(
                generation = generation,
                current_generation = state.generation,
                index = index,
                target = transition.target().as_str(),
                "Stale detection update ignored"
            );
            return false;
        }

        match state.progress.apply(index, transition) {
            Ok(status) => {
                tracing::debug!(
                    generation = generation,
                    index = index,
                    status = status.as_str(),
                    "Detection state changed"
                );
                self.event_publisher
                    .publish_progress(generation, state.progress.clone());
                true
            }
            Err(e) => {
                tracing::warn!(generation = generation, error = %e, "Detection transition rejected");
                false
            }
        }
    }

    /// 替换为新快照并发布，返回新代号和发布的快照
    fn replace(&self, progress: DetectionProgress) -> (u64, DetectionProgress) {
        let mut state = self.lock();
        state.generation += 1;
        state.progress = progress;
        self.event_publisher
            .publish_progress(state.generation, state.progress.clone());
        (state.generation, state.progress.clone())
    }
}

/// 检测进度跟踪器
#[derive(Clone)]
pub struct DetectionTracker {
    shared: Arc<Shared>,
}

impl DetectionTracker {
    pub fn new(engine: Arc<dyn DetectionEnginePort>, event_publisher: Arc<EventPublisher>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(TrackerState {
                    generation: 0,
                    progress: DetectionProgress::empty(),
                }),
                engine,
                event_publisher,
            }),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

/// 单个文件的检测任务：pending → loading → success | error
///
/// 传输层错误在这里归一化为错误描述，不会传播给批次调用方
async fn run_detection(
    shared: Arc<Shared>,
    generation: u64,
    index: usize,
    file: RegisteredFile,
) -> Option<DetectionResult> {
    if !shared.transition(generation, index, Transition::Dispatch) {
        return None;
    }

    let request = DetectRequest::from(&file);
    match shared.engine.detect(request).await {
        Ok(response) => {
            let detections = response.predictions.len();
            let result = DetectionResult::new(file.id.clone(), file.file_name.clone(), response);
            if !shared.transition(generation, index, Transition::Succeed(result.clone())) {
                return None;
            }
            tracing::info!(
                generation = generation,
                file_id = %file.id,
                detections = detections,
                "Detection succeeded"
            );
            Some(result)
        }
        Err(e) => {
            let message = e.to_string();
            if shared.transition(generation, index, Transition::Fail(message.clone())) {
                tracing::warn!(
                    generation = generation,
                    file_id = %file.id,
                    error = %message,
                    "Detection failed"
                );
            } else {
                tracing::debug!(
                    generation = generation,
                    file_id = %file.id,
                    error = %message,
                    "Stale detection failure dropped"
                );
            }
            None
        }
    }
}

#[async_trait]
impl DetectionTrackerPort for DetectionTracker {
    fn submit_batch(&self, files: Vec<RegisteredFile>) -> BatchHandle {
        let progress = DetectionProgress::new_batch(
            files.iter().map(|f| (f.id.clone(), f.file_name.clone())),
        );
        let (generation, initial) = self.shared.replace(progress);

        tracing::info!(
            generation = generation,
            file_count = files.len(),
            "Detection batch submitted"
        );

        let mut tasks = JoinSet::new();
        for (index, file) in files.into_iter().enumerate() {
            tasks.spawn(run_detection(self.shared.clone(), generation, index, file));
        }

        BatchHandle::new(generation, initial, tasks)
    }

    fn reset(&self) {
        let (generation, _) = self.shared.replace(DetectionProgress::empty());
        tracing::info!(generation = generation, "Detection progress reset");
    }

    fn current_snapshot(&self) -> DetectionProgress {
        self.shared.lock().progress.clone()
    }

    fn snapshot_with_generation(&self) -> (u64, DetectionProgress) {
        let state = self.shared.lock();
        (state.generation, state.progress.clone())
    }
}
