//! DICOM image pipeline module
//!
//! This module provides a structured approach to DICOM round trips, with
//! separate modules for reading, intensity rescaling, writing and the
//! orchestration that ties them together.

pub mod dicom;
pub mod export;
pub mod rescale;
pub mod conversions;
pub mod common;

pub use common::{
    DicomError,
    Result,
};

pub use dicom::{
    DicomImageData,
    DicomMetadata,
    DicomReader,
    ObjectDicomReader,
    decode_object,
};

pub use export::{
    TransferSyntax,
    ExportConfig,
    ExportConfigBuilder,
    DicomWriter,
    StandardDicomWriter,
};

pub use rescale::{
    PixelBuffer,
    normalize,
    denormalize,
};

pub use conversions::{
    DicomPipeline,
    load_dicom,
    save_dicom,
};
