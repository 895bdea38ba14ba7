//! DICOM Raster Decoder - 基于 dicom-rs 的栅格转换
//!
//! 解析 DICOM 字节流（带或不带 128 字节前导），解码第 0 帧并转换为 8 位 RGBA。
//! 编解码器在链接期静态注册，无需运行时初始化。

use async_trait::async_trait;
use bytes::Bytes;
use dicom_dictionary_std::tags;
use dicom_pixeldata::PixelDecoder;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

use crate::application::ports::{DecodeError, RasterDecoderPort};
use crate::domain::dicom::RasterImage;

const PREAMBLE_LEN: usize = 128;
const MAGIC: &[u8; 4] = b"DICM";

/// DICOM 栅格解码器
#[derive(Debug, Default, Clone)]
pub struct DicomRasterDecoder;

impl DicomRasterDecoder {
    pub fn new() -> Self {
        Self
    }

    /// 同步解码，CPU 密集，调用方负责放到阻塞线程池
    pub fn decode_blocking(data: &[u8]) -> Result<RasterImage, DecodeError> {
        let obj = dicom_object::from_reader(Cursor::new(strip_preamble(data)?))
            .map_err(|e| DecodeError::InvalidDicom(e.to_string()))?;

        if obj.element(tags::PIXEL_DATA).is_err() {
            return Err(DecodeError::MissingPixelData);
        }

        let pixels = obj
            .decode_pixel_data()
            .map_err(|e| DecodeError::PixelDecode(e.to_string()))?;
        let rgba = pixels
            .to_dynamic_image(0)
            .map_err(|e| DecodeError::PixelDecode(e.to_string()))?
            .to_rgba8();

        let (width, height) = (rgba.width(), rgba.height());
        RasterImage::new(width, height, rgba.into_raw())
            .map_err(|e| DecodeError::InvalidRaster(e.to_string()))
    }
}

/// 跳过文件前导，返回从 "DICM" 魔数之后开始的数据
fn strip_preamble(data: &[u8]) -> Result<&[u8], DecodeError> {
    if data.len() >= PREAMBLE_LEN + MAGIC.len() && &data[PREAMBLE_LEN..PREAMBLE_LEN + MAGIC.len()] == MAGIC {
        Ok(&data[PREAMBLE_LEN..])
    } else if data.starts_with(MAGIC) {
        Ok(data)
    } else {
        Err(DecodeError::InvalidDicom("missing DICM magic".to_string()))
    }
}

#[async_trait]
impl RasterDecoderPort for DicomRasterDecoder {
    async fn decode(&self, data: Bytes) -> Result<RasterImage, DecodeError> {
        let size = data.len();
        let raster = tokio::task::spawn_blocking(move || Self::decode_blocking(&data))
            .await
            .map_err(|e| DecodeError::Unavailable(e.to_string()))??;

        tracing::debug!(
            size,
            width = raster.width(),
            height = raster.height(),
            "DICOM raster decoded"
        );
        Ok(raster)
    }
}

/// 将栅格编码为 PNG（预览用）
pub fn encode_png(raster: &RasterImage) -> Result<Vec<u8>, image::ImageError> {
    let Some(buffer) = RgbaImage::from_raw(raster.width(), raster.height(), raster.pixels().to_vec())
    else {
        return Err(image::ImageError::Parameter(image::error::ParameterError::from_kind(
            image::error::ParameterErrorKind::DimensionMismatch,
        )));
    };

    let mut out = Cursor::new(Vec::new());
    buffer.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{DataElement, PrimitiveValue, VR};
    use dicom_object::{FileMetaTableBuilder, InMemDicomObject};

    /// 2x2 8 位灰度图，显式 VR 小端
    fn sample_dicom(with_pixels: bool) -> Vec<u8> {
        let mut elements = vec![
            DataElement::new(tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16)),
            DataElement::new(
                tags::PHOTOMETRIC_INTERPRETATION,
                VR::CS,
                PrimitiveValue::from("MONOCHROME2"),
            ),
            DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(2_u16)),
            DataElement::new(tags::COLUMNS, VR::US, PrimitiveValue::from(2_u16)),
            DataElement::new(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(8_u16)),
            DataElement::new(tags::BITS_STORED, VR::US, PrimitiveValue::from(8_u16)),
            DataElement::new(tags::HIGH_BIT, VR::US, PrimitiveValue::from(7_u16)),
            DataElement::new(tags::PIXEL_REPRESENTATION, VR::US, PrimitiveValue::from(0_u16)),
        ];
        if with_pixels {
            elements.push(DataElement::new(
                tags::PIXEL_DATA,
                VR::OB,
                PrimitiveValue::from(vec![0_u8, 64, 128, 255]),
            ));
        }

        let obj = InMemDicomObject::from_element_iter(elements)
            .with_meta(
                FileMetaTableBuilder::new()
                    .transfer_syntax("1.2.840.10008.1.2.1")
                    .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.1.3")
                    .media_storage_sop_instance_uid("1.2.3.4.5.6"),
            )
            .unwrap();

        let mut buf = Vec::new();
        obj.write_all(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_strip_preamble() {
        let mut with_preamble = vec![0_u8; PREAMBLE_LEN];
        with_preamble.extend_from_slice(b"DICMrest");
        assert_eq!(strip_preamble(&with_preamble).unwrap(), b"DICMrest");
        assert_eq!(strip_preamble(b"DICMrest").unwrap(), b"DICMrest");
        assert!(matches!(
            strip_preamble(b"not a dicom file"),
            Err(DecodeError::InvalidDicom(_))
        ));
    }

    #[tokio::test]
    async fn test_decode_grayscale_to_rgba() {
        let decoder = DicomRasterDecoder::new();
        let raster = decoder.decode(Bytes::from(sample_dicom(true))).await.unwrap();
        assert_eq!(raster.width(), 2);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.pixels().len(), 16);
    }

    #[tokio::test]
    async fn test_decode_is_idempotent() {
        let decoder = DicomRasterDecoder::new();
        let data = Bytes::from(sample_dicom(true));
        let first = decoder.decode(data.clone()).await.unwrap();
        let second = decoder.decode(data).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_pixel_data() {
        let decoder = DicomRasterDecoder::new();
        let err = decoder
            .decode(Bytes::from(sample_dicom(false)))
            .await
            .unwrap_err();
        assert!(matches!(err, DecodeError::MissingPixelData));
    }

    #[tokio::test]
    async fn test_garbage_is_invalid() {
        let decoder = DicomRasterDecoder::new();
        let err = decoder
            .decode(Bytes::from_static(b"definitely not dicom"))
            .await
            .unwrap_err();
        assert!(matches!(err, DecodeError::InvalidDicom(_)));

        let mut truncated = vec![0_u8; PREAMBLE_LEN];
        truncated.extend_from_slice(b"DICM\x02\x00");
        let err = decoder.decode(Bytes::from(truncated)).await.unwrap_err();
        assert!(matches!(err, DecodeError::InvalidDicom(_)));
    }

    #[test]
    fn test_encode_png_signature() {
        let raster = RasterImage::new(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]).unwrap();
        let png = encode_png(&raster).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
