//! Dicom Context - DICOM 文件限界上下文
//!
//! 职责:
//! - 已注册文件（RegisteredFile）的不可变数据
//! - 栅格图像（RasterImage）句柄
//! - 文件大小等展示辅助

mod aggregate;
mod value_objects;

pub use aggregate::{FileUpdate, RegisteredFile};
pub use value_objects::{format_file_size, generate_file_id, RasterImage};
