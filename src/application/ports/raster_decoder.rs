//! Raster Decoder Port - DICOM 栅格转换抽象
//!
//! decode(bytes) -> RasterImage，幂等且无副作用

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::domain::dicom::RasterImage;

/// 解码错误
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid DICOM file: {0}")]
    InvalidDicom(String),

    #[error("Missing pixel data")]
    MissingPixelData,

    #[error("Failed to decode pixel data: {0}")]
    PixelDecode(String),

    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    #[error("Decoder unavailable: {0}")]
    Unavailable(String),
}

/// Raster Decoder Port
#[async_trait]
pub trait RasterDecoderPort: Send + Sync {
    /// 解码 DICOM 字节流为 RGBA 栅格图像
    async fn decode(&self, data: Bytes) -> Result<RasterImage, DecodeError>;
}
