//! File Commands

use bytes::Bytes;
use std::path::Path;

use crate::application::error::ApplicationError;

/// 注册文件命令（上传一个 DICOM 文件）
#[derive(Debug, Clone)]
pub struct RegisterFile {
    pub file_name: String,
    pub data: Bytes,
}

/// 移除文件命令
#[derive(Debug, Clone)]
pub struct RemoveFile {
    pub id: String,
}

/// 清空文件命令
#[derive(Debug, Clone)]
pub struct ClearFiles;

/// 重命名文件命令
#[derive(Debug, Clone)]
pub struct RenameFile {
    pub id: String,
    pub file_name: String,
}

/// 上传校验规则
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    /// 单文件最大字节数
    pub max_file_size: u64,
    /// 允许的扩展名（小写，不带点）
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            allowed_extensions: vec!["dcm".to_string(), "rvg".to_string()],
        }
    }
}

impl UploadPolicy {
    /// 校验文件名扩展名和大小
    pub fn validate(&self, file_name: &str, size: u64) -> Result<(), ApplicationError> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        let allowed = ext
            .as_ref()
            .map(|e| self.allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(e)))
            .unwrap_or(false);
        if !allowed {
            return Err(ApplicationError::validation(format!(
                "Only {} files are allowed: {}",
                self.allowed_extensions
                    .iter()
                    .map(|e| format!(".{}", e))
                    .collect::<Vec<_>>()
                    .join("/"),
                file_name
            )));
        }

        if size == 0 {
            return Err(ApplicationError::validation(format!("File is empty: {}", file_name)));
        }

        if size > self.max_file_size {
            return Err(ApplicationError::validation(format!(
                "File size ({} bytes) exceeds maximum allowed size ({} bytes)",
                size, self.max_file_size
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_dicom_extensions_case_insensitive() {
        let policy = UploadPolicy::default();
        assert!(policy.validate("scan.dcm", 100).is_ok());
        assert!(policy.validate("SCAN.DCM", 100).is_ok());
        assert!(policy.validate("bitewing.rvg", 100).is_ok());
    }

    #[test]
    fn test_rejects_other_extensions() {
        let policy = UploadPolicy::default();
        assert!(policy.validate("photo.jpg", 100).is_err());
        assert!(policy.validate("noext", 100).is_err());
    }

    #[test]
    fn test_rejects_empty_and_oversized() {
        let policy = UploadPolicy::default();
        assert!(policy.validate("scan.dcm", 0).is_err());
        assert!(policy.validate("scan.dcm", 10 * 1024 * 1024).is_ok());
        assert!(policy.validate("scan.dcm", 10 * 1024 * 1024 + 1).is_err());
    }
}
