//! File Registry Port - 已注册文件集合
//!
//! 有序集合，所有操作都是全函数：不存在的 ID 视为空操作

use crate::domain::dicom::{FileUpdate, RegisteredFile};

/// File Registry Port
pub trait FileRegistryPort: Send + Sync {
    /// 追加到末尾（不按内容去重，ID 由调用方保证唯一）
    fn add(&self, file: RegisteredFile);

    /// 按 ID 移除，返回被移除的文件
    fn remove(&self, id: &str) -> Option<RegisteredFile>;

    /// 清空，返回清除数量
    fn clear(&self) -> usize;

    /// 合并部分字段，返回更新后的文件
    fn update(&self, id: &str, update: FileUpdate) -> Option<RegisteredFile>;

    /// 按 ID 获取
    fn get(&self, id: &str) -> Option<RegisteredFile>;

    /// 有序快照
    fn list(&self) -> Vec<RegisteredFile>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
