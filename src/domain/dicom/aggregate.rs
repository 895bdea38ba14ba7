//! Dicom Context - RegisteredFile

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::value_objects::{generate_file_id, RasterImage};

/// 已注册文件
///
/// 栅格转换成功后创建，此后不做原地修改；`update` 通过替换字段生成新值
#[derive(Debug, Clone)]
pub struct RegisteredFile {
    pub id: String,
    pub file_name: String,
    pub file_size_bytes: u64,
    /// 解码后的栅格图像（共享句柄）
    pub raster: Arc<RasterImage>,
    /// 原始 DICOM 字节，检测请求时上传
    pub original: Bytes,
    pub registered_at: DateTime<Utc>,
}

impl RegisteredFile {
    pub fn new(file_name: impl Into<String>, original: Bytes, raster: RasterImage) -> Self {
        let file_name = file_name.into();
        Self {
            id: generate_file_id(&file_name),
            file_size_bytes: original.len() as u64,
            file_name,
            raster: Arc::new(raster),
            original,
            registered_at: Utc::now(),
        }
    }

    pub fn raster_width(&self) -> u32 {
        self.raster.width()
    }

    pub fn raster_height(&self) -> u32 {
        self.raster.height()
    }

    /// 合并部分更新，未设置的字段保持不变
    pub fn merged(&self, update: FileUpdate) -> Self {
        Self {
            id: self.id.clone(),
            file_name: update.file_name.unwrap_or_else(|| self.file_name.clone()),
            file_size_bytes: self.file_size_bytes,
            raster: self.raster.clone(),
            original: self.original.clone(),
            registered_at: self.registered_at,
        }
    }
}

/// 文件部分更新
#[derive(Debug, Clone, Default)]
pub struct FileUpdate {
    pub file_name: Option<String>,
}

impl FileUpdate {
    pub fn rename(file_name: impl Into<String>) -> Self {
        Self {
            file_name: Some(file_name.into()),
        }
    }
}
