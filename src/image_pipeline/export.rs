//! DICOM writing module
//!
//! This module reconstructs minimal, valid DICOM files from a 16-bit pixel
//! buffer and the metadata carried over from a source image.

mod writer;
mod standard_dicom_writer;
pub mod types;

pub use writer::DicomWriter;
pub use standard_dicom_writer::{
    DEFAULT_MODALITY, DEFAULT_PATIENT_ID, DEFAULT_SERIES_INSTANCE_UID, DEFAULT_SOP_INSTANCE_UID,
    DEFAULT_STUDY_INSTANCE_UID, StandardDicomWriter,
};
pub use types::{ExportConfig, ExportConfigBuilder, TransferSyntax};
