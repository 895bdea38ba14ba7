//! Detection Tracker Port - 多文件检测进度跟踪
//!
//! 定义批次提交、重置和快照读取的抽象接口，具体实现在 infrastructure/worker 层

use async_trait::async_trait;
use tokio::task::JoinSet;

use crate::domain::detection::{DetectionProgress, DetectionResult};
use crate::domain::dicom::RegisteredFile;

/// 已提交批次的句柄
///
/// 每个文件一个任务；`join` 按完成顺序收集成功结果。
/// 丢弃句柄会中止尚未完成的任务，不等待时应调用 `detach`。
pub struct BatchHandle {
    generation: u64,
    initial: DetectionProgress,
    tasks: JoinSet<Option<DetectionResult>>,
}

impl BatchHandle {
    pub fn new(
        generation: u64,
        initial: DetectionProgress,
        tasks: JoinSet<Option<DetectionResult>>,
    ) -> Self {
        Self {
            generation,
            initial,
            tasks,
        }
    }

    /// 批次代号
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 提交时发布的快照（全部为 pending），不受之后迁移影响
    pub fn initial(&self) -> &DetectionProgress {
        &self.initial
    }

    /// 尚未完成的任务数
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// 等待所有任务结束，返回成功结果（完成顺序）
    ///
    /// 失败或已过期（reset / 新批次之后才完成）的文件不在返回值中
    pub async fn join(mut self) -> Vec<DetectionResult> {
        let mut results = Vec::with_capacity(self.tasks.len());

        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(
                        generation = self.generation,
                        error = %e,
                        "Detection task aborted"
                    );
                }
            }
        }

        results
    }

    /// 后台运行，不关心返回值
    pub fn detach(self) {
        tokio::spawn(async move {
            let generation = self.generation;
            let results = self.join().await;
            tracing::debug!(
                generation = generation,
                succeeded = results.len(),
                "Detached detection batch finished"
            );
        });
    }
}

/// Detection Tracker Port
#[async_trait]
pub trait DetectionTrackerPort: Send + Sync {
    /// 替换当前批次并为每个文件并发发起检测，立即返回
    ///
    /// 返回前新快照已经发布（所有条目为 pending）
    fn submit_batch(&self, files: Vec<RegisteredFile>) -> BatchHandle;

    /// 提交并等待批次结束，返回成功结果（完成顺序）
    async fn start_batch(&self, files: Vec<RegisteredFile>) -> Vec<DetectionResult> {
        self.submit_batch(files).join().await
    }

    /// 丢弃当前批次，进行中的请求结果将被忽略
    fn reset(&self);

    /// 当前快照（非阻塞）
    fn current_snapshot(&self) -> DetectionProgress;

    /// 当前批次代号与快照（同一时刻读取）
    fn snapshot_with_generation(&self) -> (u64, DetectionProgress);
}
