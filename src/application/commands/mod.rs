//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod detection_commands;
mod file_commands;
mod report_commands;

pub mod handlers;

pub use detection_commands::*;
pub use file_commands::*;
pub use report_commands::*;
