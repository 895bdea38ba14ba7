//! Detection Context - 批次进度状态机
//!
//! 每个文件的状态只能前进：
//! pending --(dispatch)--> loading --(success)--> success
//!                                 --(failure)--> error
//!
//! 批次级标志（is_all_complete / has_any_results / has_any_errors）
//! 只由 `recompute` 从条目推导，任何变更之后立即重算。

use serde::Serialize;
use thiserror::Error;

use super::value_objects::DetectionResult;

/// 进度错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    #[error("Detection entry not found: #{0}")]
    EntryNotFound(usize),

    #[error("Invalid state transition for {file_id}: {from} -> {to}")]
    InvalidTransition {
        file_id: String,
        from: &'static str,
        to: &'static str,
    },
}

/// 文件检测状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// 等待发送
    Pending,
    /// 请求中
    Loading,
    /// 检测成功
    Success,
    /// 检测失败
    Error,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Pending => "pending",
            FileStatus::Loading => "loading",
            FileStatus::Success => "success",
            FileStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FileStatus::Success | FileStatus::Error)
    }

    pub fn can_transition_to(&self, next: FileStatus) -> bool {
        matches!(
            (self, next),
            (FileStatus::Pending, FileStatus::Loading)
                | (FileStatus::Loading, FileStatus::Success)
                | (FileStatus::Loading, FileStatus::Error)
        )
    }
}

/// 状态迁移
#[derive(Debug, Clone)]
pub enum Transition {
    /// 开始请求
    Dispatch,
    /// 请求成功
    Succeed(DetectionResult),
    /// 请求失败（已归一化的错误描述）
    Fail(String),
}

impl Transition {
    pub fn target(&self) -> FileStatus {
        match self {
            Transition::Dispatch => FileStatus::Loading,
            Transition::Succeed(_) => FileStatus::Success,
            Transition::Fail(_) => FileStatus::Error,
        }
    }
}

/// 单个文件在批次中的检测状态
///
/// `result` 仅在 success 时存在，`error` 仅在 error 时存在
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDetectionState {
    pub file_id: String,
    pub file_name: String,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DetectionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileDetectionState {
    pub fn pending(file_id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            file_name: file_name.into(),
            status: FileStatus::Pending,
            result: None,
            error: None,
        }
    }
}

/// 批次进度快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionProgress {
    files: Vec<FileDetectionState>,
    is_all_complete: bool,
    has_any_results: bool,
    has_any_errors: bool,
}

impl DetectionProgress {
    /// 空批次（reset 之后的状态），所有条目均已结束的条件空真成立
    pub fn empty() -> Self {
        Self::from_entries(Vec::new())
    }

    /// 新批次，所有条目为 pending，顺序即提交顺序
    pub fn new_batch<I, S1, S2>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S1, S2)>,
        S1: Into<String>,
        S2: Into<String>,
    {
        Self::from_entries(
            entries
                .into_iter()
                .map(|(file_id, file_name)| FileDetectionState::pending(file_id, file_name))
                .collect(),
        )
    }

    fn from_entries(files: Vec<FileDetectionState>) -> Self {
        let mut progress = Self {
            files,
            is_all_complete: false,
            has_any_results: false,
            has_any_errors: false,
        };
        progress.recompute();
        progress
    }

    /// 对第 `index` 个条目执行状态迁移，成功后重算批次标志
    pub fn apply(&mut self, index: usize, transition: Transition) -> Result<FileStatus, ProgressError> {
        let entry = self
            .files
            .get_mut(index)
            .ok_or(ProgressError::EntryNotFound(index))?;

        let next = transition.target();
        if !entry.status.can_transition_to(next) {
            return Err(ProgressError::InvalidTransition {
                file_id: entry.file_id.clone(),
                from: entry.status.as_str(),
                to: next.as_str(),
            });
        }

        entry.status = next;
        match transition {
            Transition::Dispatch => {}
            Transition::Succeed(result) => entry.result = Some(result),
            Transition::Fail(message) => entry.error = Some(message),
        }

        self.recompute();
        Ok(next)
    }

    fn recompute(&mut self) {
        self.is_all_complete = self.files.iter().all(|f| f.status.is_terminal());
        self.has_any_results = self.files.iter().any(|f| f.status == FileStatus::Success);
        self.has_any_errors = self.files.iter().any(|f| f.status == FileStatus::Error);
    }

    pub fn files(&self) -> &[FileDetectionState] {
        &self.files
    }

    pub fn is_all_complete(&self) -> bool {
        self.is_all_complete
    }

    pub fn has_any_results(&self) -> bool {
        self.has_any_results
    }

    pub fn has_any_errors(&self) -> bool {
        self.has_any_errors
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn count(&self, status: FileStatus) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }

    /// 查找文件的检测状态（同一文件重复提交时返回第一个）
    pub fn find(&self, file_id: &str) -> Option<&FileDetectionState> {
        self.files.iter().find(|f| f.file_id == file_id)
    }
}

impl Default for DetectionProgress {
    fn default() -> Self {
        Self::empty()
    }
}
