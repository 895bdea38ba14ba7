//! Dicom Context - Value Objects

use std::fmt;
use uuid::Uuid;

/// 解码后的栅格图像（RGBA8，行优先）
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// 每像素字节数（RGBA）
    pub const BYTES_PER_PIXEL: usize = 4;

    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, &'static str> {
        if width == 0 || height == 0 {
            return Err("栅格图像宽高必须大于0");
        }
        let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err("像素缓冲区长度与宽高不匹配");
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixels_len", &self.pixels.len())
            .finish()
    }
}

/// 生成文件 ID：`<文件名>-<uuid>`，会话内不会重复
pub fn generate_file_id(file_name: &str) -> String {
    format!("{}-{}", file_name, Uuid::new_v4().simple())
}

/// 文件大小格式化（Bytes / KB / MB / GB，最多保留两位小数）
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_rejects_zero_dimensions() {
        assert!(RasterImage::new(0, 10, vec![]).is_err());
        assert!(RasterImage::new(10, 0, vec![]).is_err());
    }

    #[test]
    fn test_raster_rejects_wrong_buffer_len() {
        assert!(RasterImage::new(2, 2, vec![0; 15]).is_err());
        let raster = RasterImage::new(2, 2, vec![0; 16]).unwrap();
        assert_eq!(raster.width(), 2);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.pixels().len(), 16);
    }

    #[test]
    fn test_generate_file_id_unique() {
        let a = generate_file_id("scan.dcm");
        let b = generate_file_id("scan.dcm");
        assert!(a.starts_with("scan.dcm-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }
}
