use std::io::Write;

use chrono::Local;
use dicom_core::{DataElement, PrimitiveValue, VR};
use dicom_dictionary_std::{tags, uids};
use dicom_object::{FileMetaTableBuilder, InMemDicomObject};
use ndarray::Array2;
use tracing::debug;

use crate::image_pipeline::common::error::{DicomError, Result};
use crate::image_pipeline::dicom::types::DicomMetadata;
use crate::image_pipeline::export::types::ExportConfig;
use crate::image_pipeline::export::writer::DicomWriter;

pub const DEFAULT_PATIENT_ID: &str = "Unknown";
pub const DEFAULT_STUDY_INSTANCE_UID: &str = "1.2.3";
pub const DEFAULT_SERIES_INSTANCE_UID: &str = "1.2.3.1";
pub const DEFAULT_SOP_INSTANCE_UID: &str = "1.2.3.1.1";
/// "Other" modality
pub const DEFAULT_MODALITY: &str = "OT";

const CONTENT_DATE_FORMAT: &str = "%Y%m%d";
const CONTENT_TIME_FORMAT: &str = "%H%M%S%.6f";

/// Writes a minimal single-frame MONOCHROME2 Secondary Capture object.
///
/// The pixel description (dimensions, bit depth, photometric interpretation)
/// always comes from the buffer; only identification fields come from the
/// metadata.
pub struct StandardDicomWriter;

impl DicomWriter for StandardDicomWriter {
    fn write_dicom(
        &self,
        pixels: &Array2<u16>,
        metadata: &DicomMetadata,
        output: &mut dyn Write,
        config: &ExportConfig,
    ) -> Result<()> {
        let (rows, columns) = pixels.dim();
        debug!("Encoding DICOM image: {}x{}", columns, rows);

        let (Ok(row_count), Ok(column_count)) = (u16::try_from(rows), u16::try_from(columns)) else {
            return Err(DicomError::InvalidDimensions(rows, columns));
        };

        let sop_instance_uid = field_or(&metadata.sop_instance_uid, DEFAULT_SOP_INSTANCE_UID);

        let mut obj = InMemDicomObject::new_empty();

        put_str(&mut obj, tags::SOP_CLASS_UID, VR::UI, uids::SECONDARY_CAPTURE_IMAGE_STORAGE);
        put_str(&mut obj, tags::SOP_INSTANCE_UID, VR::UI, sop_instance_uid);
        put_str(
            &mut obj,
            tags::PATIENT_ID,
            VR::LO,
            field_or(&metadata.patient_id, DEFAULT_PATIENT_ID),
        );
        put_str(
            &mut obj,
            tags::STUDY_INSTANCE_UID,
            VR::UI,
            field_or(&metadata.study_instance_uid, DEFAULT_STUDY_INSTANCE_UID),
        );
        put_str(
            &mut obj,
            tags::SERIES_INSTANCE_UID,
            VR::UI,
            field_or(&metadata.series_instance_uid, DEFAULT_SERIES_INSTANCE_UID),
        );
        put_str(
            &mut obj,
            tags::MODALITY,
            VR::CS,
            field_or(&metadata.modality, DEFAULT_MODALITY),
        );

        if config.stamp_content_datetime {
            let now = Local::now();
            put_str(
                &mut obj,
                tags::CONTENT_DATE,
                VR::DA,
                &now.format(CONTENT_DATE_FORMAT).to_string(),
            );
            put_str(
                &mut obj,
                tags::CONTENT_TIME,
                VR::TM,
                &now.format(CONTENT_TIME_FORMAT).to_string(),
            );
        }

        put_u16(&mut obj, tags::SAMPLES_PER_PIXEL, 1);
        put_str(&mut obj, tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "MONOCHROME2");
        put_u16(&mut obj, tags::ROWS, row_count);
        put_u16(&mut obj, tags::COLUMNS, column_count);
        put_u16(&mut obj, tags::BITS_ALLOCATED, 16);
        put_u16(&mut obj, tags::BITS_STORED, 16);
        put_u16(&mut obj, tags::HIGH_BIT, 15);
        put_u16(&mut obj, tags::PIXEL_REPRESENTATION, 0);

        // Logical (row-major) order regardless of the array's memory layout
        obj.put(DataElement::new(
            tags::PIXEL_DATA,
            VR::OW,
            PrimitiveValue::U16(pixels.iter().copied().collect()),
        ));

        let file_obj = obj
            .with_meta(
                FileMetaTableBuilder::new()
                    .transfer_syntax(config.transfer_syntax.uid())
                    .media_storage_sop_class_uid(uids::SECONDARY_CAPTURE_IMAGE_STORAGE)
                    .media_storage_sop_instance_uid(sop_instance_uid),
            )
            .map_err(|e| DicomError::WriteError(e.to_string()))?;

        file_obj
            .write_all(output)
            .map_err(|e| DicomError::WriteError(e.to_string()))?;

        debug!("DICOM encoding complete");
        Ok(())
    }
}

fn field_or<'a>(field: &'a Option<String>, default: &'a str) -> &'a str {
    field.as_deref().unwrap_or(default)
}

fn put_str(obj: &mut InMemDicomObject, tag: dicom_core::Tag, vr: VR, value: &str) {
    obj.put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
}

fn put_u16(obj: &mut InMemDicomObject, tag: dicom_core::Tag, value: u16) {
    obj.put(DataElement::new(tag, VR::US, PrimitiveValue::from(value)));
}
