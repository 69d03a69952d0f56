//! DICOM reader implementation using the dicom-rs object model.
//!
//! Files are parsed with `dicom-object`, then the descriptive fields and the
//! native (uncompressed) pixel data of a single monochrome frame are
//! extracted.

use std::borrow::Cow;
use std::path::Path;

use dicom_core::Tag;
use dicom_core::value::{PrimitiveValue, Value};
use dicom_dictionary_std::tags;
use dicom_object::{InMemDicomObject, open_file};
use ndarray::Array2;
use tracing::debug;

use crate::image_pipeline::common::error::{DicomError, Result};
use crate::image_pipeline::dicom::reader::DicomReader;
use crate::image_pipeline::dicom::types::{
    DEFAULT_BITS_ALLOCATED, DicomImageData, DicomMetadata, UNKNOWN_VALUE,
};

/// Reader backed by `dicom_object::open_file`.
///
/// Supports native pixel data with 8, 16 or 32 bits allocated, signed or
/// unsigned, stored as either OB or OW.
pub struct ObjectDicomReader;

impl DicomReader for ObjectDicomReader {
    fn read_dicom(&self, path: &Path) -> Result<DicomImageData> {
        debug!("Opening DICOM file {}", path.display());

        let obj = open_file(path).map_err(|e| DicomError::ParseError(e.to_string()))?;

        debug!(
            transfer_syntax = obj.meta().transfer_syntax(),
            "Parsed file meta group"
        );

        decode_object(&obj)
    }
}

/// Extracts metadata and the pixel samples of an in-memory data set.
pub fn decode_object(obj: &InMemDicomObject) -> Result<DicomImageData> {
    let metadata = extract_metadata(obj)?;

    let samples_per_pixel = get_u16(obj, tags::SAMPLES_PER_PIXEL).unwrap_or(1);
    if samples_per_pixel != 1 {
        return Err(DicomError::UnsupportedFormat(format!(
            "SamplesPerPixel {}, only single-channel images are supported",
            samples_per_pixel
        )));
    }

    let frames = get_u32(obj, tags::NUMBER_OF_FRAMES).unwrap_or(1);
    if frames > 1 {
        return Err(DicomError::UnsupportedFormat(format!(
            "{} frames, only single-frame images are supported",
            frames
        )));
    }

    let signed = get_u16(obj, tags::PIXEL_REPRESENTATION).unwrap_or(0) == 1;
    let rows = metadata.rows as usize;
    let columns = metadata.columns as usize;

    let pixel_data = obj
        .element(tags::PIXEL_DATA)
        .map_err(|e| DicomError::ParseError(format!("PixelData: {}", e)))?;

    // Words are re-serialized little endian so both storage forms decode alike
    let bytes: Cow<'_, [u8]> = match pixel_data.value() {
        Value::Primitive(PrimitiveValue::U8(bytes)) => Cow::Borrowed(&bytes[..]),
        Value::Primitive(PrimitiveValue::U16(words)) => {
            Cow::Owned(words.iter().flat_map(|w| w.to_le_bytes()).collect())
        }
        Value::PixelSequence(_) => {
            return Err(DicomError::UnsupportedFormat(
                "encapsulated (compressed) pixel data".to_string(),
            ));
        }
        _ => {
            return Err(DicomError::ParseError(
                "PixelData is not a native byte or word value".to_string(),
            ));
        }
    };

    debug!(
        rows,
        columns,
        bits_allocated = metadata.bits_allocated,
        signed,
        payload_bytes = bytes.len(),
        "Decoding pixel data"
    );

    let samples = decode_samples(&bytes, metadata.bits_allocated, signed, rows * columns)?;
    let samples = Array2::from_shape_vec((rows, columns), samples)
        .map_err(|e| DicomError::ParseError(e.to_string()))?;

    Ok(DicomImageData { samples, metadata })
}

fn extract_metadata(obj: &InMemDicomObject) -> Result<DicomMetadata> {
    let rows = get_u32(obj, tags::ROWS)
        .ok_or_else(|| DicomError::ParseError("missing or invalid Rows".to_string()))?;
    let columns = get_u32(obj, tags::COLUMNS)
        .ok_or_else(|| DicomError::ParseError("missing or invalid Columns".to_string()))?;

    Ok(DicomMetadata {
        patient_id: Some(
            get_string(obj, tags::PATIENT_ID).unwrap_or_else(|| UNKNOWN_VALUE.to_string()),
        ),
        study_instance_uid: get_string(obj, tags::STUDY_INSTANCE_UID),
        series_instance_uid: get_string(obj, tags::SERIES_INSTANCE_UID),
        sop_instance_uid: get_string(obj, tags::SOP_INSTANCE_UID),
        modality: Some(
            get_string(obj, tags::MODALITY).unwrap_or_else(|| UNKNOWN_VALUE.to_string()),
        ),
        rows,
        columns,
        bits_allocated: get_u16(obj, tags::BITS_ALLOCATED).unwrap_or(DEFAULT_BITS_ALLOCATED),
    })
}

fn decode_samples(
    bytes: &[u8],
    bits_allocated: u16,
    signed: bool,
    sample_count: usize,
) -> Result<Vec<f32>> {
    let bytes_per_sample = match bits_allocated {
        8 => 1,
        16 => 2,
        32 => 4,
        other => {
            return Err(DicomError::UnsupportedFormat(format!(
                "BitsAllocated {}",
                other
            )));
        }
    };

    // OB values of odd length carry one trailing pad byte
    let expected = sample_count * bytes_per_sample;
    let padded = expected + expected % 2;
    if bytes.len() != expected && bytes.len() != padded {
        return Err(DicomError::ParseError(format!(
            "pixel data holds {} bytes, expected {} for {} samples of {} bits",
            bytes.len(),
            expected,
            sample_count,
            bits_allocated
        )));
    }
    let payload = &bytes[..expected];

    let samples = match (bytes_per_sample, signed) {
        (1, false) => payload.iter().map(|&b| f32::from(b)).collect(),
        (1, true) => payload.iter().map(|&b| f32::from(b as i8)).collect(),
        (2, false) => payload
            .chunks_exact(2)
            .map(|c| f32::from(u16::from_le_bytes([c[0], c[1]])))
            .collect(),
        (2, true) => payload
            .chunks_exact(2)
            .map(|c| f32::from(i16::from_le_bytes([c[0], c[1]])))
            .collect(),
        (_, false) => payload
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f32)
            .collect(),
        (_, true) => payload
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f32)
            .collect(),
    };

    Ok(samples)
}

// --- Helpers ---

fn get_string(obj: &InMemDicomObject, tag: Tag) -> Option<String> {
    obj.element(tag)
        .ok()?
        .to_str()
        .ok()
        .map(|s| s.trim_end_matches(['\0', ' ']).to_string())
}

fn get_u32(obj: &InMemDicomObject, tag: Tag) -> Option<u32> {
    obj.element(tag).ok()?.to_int::<u32>().ok()
}

fn get_u16(obj: &InMemDicomObject, tag: Tag) -> Option<u16> {
    obj.element(tag).ok()?.to_int::<u16>().ok()
}
