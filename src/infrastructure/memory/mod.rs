//! Memory Layer - In-Memory State Management
//!
//! 实现 FileRegistry，管理已上传文件的内存状态

mod file_registry;

pub use file_registry::InMemoryFileRegistry;
