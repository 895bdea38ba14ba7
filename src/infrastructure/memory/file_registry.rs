//! In-Memory File Registry Implementation

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::application::ports::FileRegistryPort;
use crate::domain::dicom::{FileUpdate, RegisteredFile};

/// 内存文件注册表（保持插入顺序）
pub struct InMemoryFileRegistry {
    files: RwLock<Vec<RegisteredFile>>,
}

impl InMemoryFileRegistry {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(Vec::new()),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<RegisteredFile>> {
        self.files.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<RegisteredFile>> {
        self.files.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryFileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FileRegistryPort for InMemoryFileRegistry {
    fn add(&self, file: RegisteredFile) {
        self.write().push(file);
    }

    fn remove(&self, id: &str) -> Option<RegisteredFile> {
        let mut files = self.write();
        let index = files.iter().position(|f| f.id == id)?;
        Some(files.remove(index))
    }

    fn clear(&self) -> usize {
        let mut files = self.write();
        let count = files.len();
        files.clear();
        count
    }

    fn update(&self, id: &str, update: FileUpdate) -> Option<RegisteredFile> {
        let mut files = self.write();
        let file = files.iter_mut().find(|f| f.id == id)?;
        *file = file.merged(update);
        Some(file.clone())
    }

    fn get(&self, id: &str) -> Option<RegisteredFile> {
        self.read().iter().find(|f| f.id == id).cloned()
    }

    fn list(&self) -> Vec<RegisteredFile> {
        self.read().clone()
    }

    fn len(&self) -> usize {
        self.read().len()
    }
}
