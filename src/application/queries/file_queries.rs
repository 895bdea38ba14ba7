//! File Queries

/// 列出所有已注册文件
#[derive(Debug, Clone)]
pub struct ListFiles;

/// 获取单个文件
#[derive(Debug, Clone)]
pub struct GetFile {
    pub id: String,
}
