//! DICOM image data types

use ndarray::Array2;

/// PatientID / Modality reported by the reader when the source omits them.
pub const UNKNOWN_VALUE: &str = "Unknown";

/// BitsAllocated assumed when the source omits it.
pub const DEFAULT_BITS_ALLOCATED: u16 = 16;

/// Descriptive fields carried from a source file to a reconstructed one.
///
/// String fields are optional so a writer can tell an absent field from a
/// present one and substitute its own defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct DicomMetadata {
    pub patient_id: Option<String>,
    pub study_instance_uid: Option<String>,
    pub series_instance_uid: Option<String>,
    pub sop_instance_uid: Option<String>,
    pub modality: Option<String>,
    /// Number of pixel rows
    pub rows: u32,
    /// Number of pixel columns
    pub columns: u32,
    /// Bits allocated per sample in the source (8, 16 or 32)
    pub bits_allocated: u16,
}

impl Default for DicomMetadata {
    fn default() -> Self {
        Self {
            patient_id: None,
            study_instance_uid: None,
            series_instance_uid: None,
            sop_instance_uid: None,
            modality: None,
            rows: 0,
            columns: 0,
            bits_allocated: DEFAULT_BITS_ALLOCATED,
        }
    }
}

/// Decoded single-frame DICOM image, before normalization
#[derive(Debug, Clone)]
pub struct DicomImageData {
    /// Raw samples converted to `f32`, shaped `(rows, columns)`
    pub samples: Array2<f32>,
    pub metadata: DicomMetadata,
}
