use tracing::{debug, info, instrument};
use std::fs;
use std::io::Write;
use std::path::Path;

use ndarray::Array2;

use crate::image_pipeline::{
    common::error::{DicomError, Result},
    dicom::{DicomMetadata, DicomReader, ObjectDicomReader},
    export::{DicomWriter, ExportConfig, StandardDicomWriter},
    rescale::{PixelBuffer, normalize},
};

pub struct DicomPipeline<R: DicomReader, W: DicomWriter> {
    reader: R,
    writer: W,
    config: ExportConfig,
}

impl DicomPipeline<ObjectDicomReader, StandardDicomWriter> {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            reader: ObjectDicomReader,
            writer: StandardDicomWriter,
            config,
        }
    }
}

impl Default for DicomPipeline<ObjectDicomReader, StandardDicomWriter> {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

impl<R: DicomReader, W: DicomWriter> DicomPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ExportConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    fn validate_dimensions(&self, rows: usize, columns: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if rows == 0 || columns == 0 {
            return Err(DicomError::InvalidDimensions(rows, columns));
        }

        Ok(())
    }

    /// Loads a DICOM file, returning its normalized pixels and metadata.
    #[instrument(skip(self, path))]
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<(Array2<f32>, DicomMetadata)> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DicomError::NotFound(path.to_path_buf()));
        }

        info!(input = %path.display(), "Loading DICOM file");

        let image = {
            let _span = tracing::info_span!("decode_dicom").entered();
            self.reader.read_dicom(path)?
        };

        {
            let _span = tracing::info_span!("validate_dimensions",
                rows = image.metadata.rows,
                columns = image.metadata.columns
            ).entered();
            let (rows, columns) = image.samples.dim();
            self.validate_dimensions(rows, columns)?;
        }

        let pixels = {
            let _span = tracing::info_span!("normalize").entered();
            normalize(&image.samples)
        };

        debug!(metadata = ?image.metadata, "Extracted metadata");
        Ok((pixels, image.metadata))
    }

    /// Encodes a pixel buffer and metadata as a DICOM file into `output`.
    #[instrument(skip(self, pixels, metadata, output))]
    pub fn encode(
        &self,
        pixels: &PixelBuffer,
        metadata: &DicomMetadata,
        output: &mut dyn Write,
    ) -> Result<()> {
        let (rows, columns) = pixels.dim();
        self.validate_dimensions(rows, columns)?;

        let samples = {
            let _span = tracing::info_span!("denormalize").entered();
            pixels.to_samples()
        };

        {
            let _span = tracing::info_span!("encode_dicom", rows, columns).entered();
            self.writer.write_dicom(&samples, metadata, output, &self.config)?;
        }

        Ok(())
    }

    /// Saves a pixel buffer and metadata as a DICOM file at `path`,
    /// creating missing parent directories.
    #[instrument(skip(self, pixels, metadata, path))]
    pub fn save<P: AsRef<Path>>(
        &self,
        pixels: &PixelBuffer,
        metadata: &DicomMetadata,
        path: P,
    ) -> Result<()> {
        let path = path.as_ref();

        // Encoded before the target is opened; a rejected buffer never truncates it
        let mut encoded = Vec::new();
        self.encode(pixels, metadata, &mut encoded)?;

        if self.config.create_parent_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                let _span = tracing::info_span!("create_output_dir").entered();
                fs::create_dir_all(parent).map_err(|e| {
                    DicomError::WriteError(format!("{}: {}", parent.display(), e))
                })?;
            }
        }

        {
            let _span = tracing::info_span!("write_output_file", bytes = encoded.len()).entered();
            fs::write(path, &encoded).map_err(|e| {
                DicomError::WriteError(format!("{}: {}", path.display(), e))
            })?;
        }

        info!("Saved reconstructed DICOM at: {}", path.display());
        Ok(())
    }

    /// Loads `input_path` and writes it back to `output_path`.
    #[instrument(skip(self, input_path, output_path))]
    pub fn round_trip<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<DicomMetadata> {
        let (pixels, metadata) = self.load(input_path)?;
        self.save(&PixelBuffer::Normalized(pixels), &metadata, output_path)?;
        Ok(metadata)
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ExportConfig) {
        self.config = config;
    }
}

/// Loads a DICOM file with the default reader.
///
/// Returns the pixels normalized to `[0, 1]` and the extracted metadata.
pub fn load_dicom<P: AsRef<Path>>(path: P) -> Result<(Array2<f32>, DicomMetadata)> {
    DicomPipeline::new(ExportConfig::default()).load(path)
}

/// Saves pixels (normalized or 16-bit) and metadata as a DICOM file with the
/// default writer and configuration.
pub fn save_dicom<P: AsRef<Path>>(
    pixels: impl Into<PixelBuffer>,
    metadata: &DicomMetadata,
    path: P,
) -> Result<()> {
    DicomPipeline::new(ExportConfig::default()).save(&pixels.into(), metadata, path)
}
