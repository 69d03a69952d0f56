use std::io::Write;

use ndarray::Array2;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::dicom::types::DicomMetadata;
use crate::image_pipeline::export::types::ExportConfig;

pub trait DicomWriter {
    fn write_dicom(
        &self,
        pixels: &Array2<u16>,
        metadata: &DicomMetadata,
        output: &mut dyn Write,
        config: &ExportConfig,
    ) -> Result<()>;
}
