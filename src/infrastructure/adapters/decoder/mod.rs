//! Decoder Adapter - DICOM 栅格转换

mod dicom_decoder;

pub use dicom_decoder::{encode_png, DicomRasterDecoder};
