//! File Query Handlers

use serde::Serialize;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::FileRegistryPort;
use crate::application::queries::{GetFile, ListFiles};
use crate::domain::dicom::{format_file_size, RegisteredFile};

// ============================================================================
// Response DTOs
// ============================================================================

/// 文件概要
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub id: String,
    pub file_name: String,
    pub file_size_bytes: u64,
    /// 可读大小，如 "1.5 MB"
    pub file_size: String,
    pub width: u32,
    pub height: u32,
    pub registered_at: String,
}

impl From<&RegisteredFile> for FileSummary {
    fn from(file: &RegisteredFile) -> Self {
        Self {
            id: file.id.clone(),
            file_name: file.file_name.clone(),
            file_size_bytes: file.file_size_bytes,
            file_size: format_file_size(file.file_size_bytes),
            width: file.raster_width(),
            height: file.raster_height(),
            registered_at: file.registered_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// ListFiles Handler
pub struct ListFilesHandler {
    registry: Arc<dyn FileRegistryPort>,
}

impl ListFilesHandler {
    pub fn new(registry: Arc<dyn FileRegistryPort>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, _query: ListFiles) -> Result<Vec<FileSummary>, ApplicationError> {
        Ok(self.registry.list().iter().map(FileSummary::from).collect())
    }
}

/// GetFile Handler
pub struct GetFileHandler {
    registry: Arc<dyn FileRegistryPort>,
}

impl GetFileHandler {
    pub fn new(registry: Arc<dyn FileRegistryPort>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, query: GetFile) -> Result<RegisteredFile, ApplicationError> {
        self.registry
            .get(&query.id)
            .ok_or_else(|| ApplicationError::not_found("File", query.id))
    }
}
