use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use ndarray::{Array2, array};

use crate::image_pipeline::common::error::{DicomError, Result};
use crate::image_pipeline::conversions::DicomPipeline;
use crate::image_pipeline::dicom::{DicomImageData, DicomMetadata, DicomReader};
use crate::image_pipeline::export::{DicomWriter, ExportConfig};
use crate::image_pipeline::rescale::PixelBuffer;

struct MockReader {
    should_fail: bool,
    mock_data: Option<DicomImageData>,
}

impl DicomReader for MockReader {
    fn read_dicom(&self, _path: &Path) -> Result<DicomImageData> {
        if self.should_fail {
            return Err(DicomError::ParseError("Mock parse error".to_string()));
        }
        Ok(self.mock_data.clone().unwrap_or(DicomImageData {
            samples: array![[100.0, 200.0], [300.0, 500.0]],
            metadata: DicomMetadata {
                rows: 2,
                columns: 2,
                ..DicomMetadata::default()
            },
        }))
    }
}

struct MockWriter {
    should_fail: bool,
    written: Arc<Mutex<Vec<(Array2<u16>, DicomMetadata)>>>,
}

impl DicomWriter for MockWriter {
    fn write_dicom(
        &self,
        pixels: &Array2<u16>,
        metadata: &DicomMetadata,
        _output: &mut dyn Write,
        _config: &ExportConfig,
    ) -> Result<()> {
        if self.should_fail {
            return Err(DicomError::WriteError("Mock write error".to_string()));
        }
        self.written
            .lock()
            .unwrap()
            .push((pixels.clone(), metadata.clone()));
        Ok(())
    }
}

fn pipeline(
    reader: MockReader,
    writer_fails: bool,
    config: ExportConfig,
) -> (
    DicomPipeline<MockReader, MockWriter>,
    Arc<Mutex<Vec<(Array2<u16>, DicomMetadata)>>>,
) {
    let written = Arc::new(Mutex::new(Vec::new()));
    let writer = MockWriter {
        should_fail: writer_fails,
        written: written.clone(),
    };
    (DicomPipeline::with_custom(reader, writer, config), written)
}

fn ok_reader() -> MockReader {
    MockReader {
        should_fail: false,
        mock_data: None,
    }
}

#[test]
fn test_load_missing_file_is_not_found() {
    let (pipeline, _) = pipeline(ok_reader(), false, ExportConfig::default());

    let result = pipeline.load("/definitely/not/here/sample.dcm");

    assert!(matches!(result.unwrap_err(), DicomError::NotFound(_)));
}

#[test]
fn test_load_normalizes_samples() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let (pipeline, _) = pipeline(ok_reader(), false, ExportConfig::default());

    let (pixels, metadata) = pipeline.load(file.path()).unwrap();

    assert_eq!(pixels[[0, 0]], 0.0);
    assert!((pixels[[1, 1]] - 1.0).abs() < 1e-6);
    assert!((pixels[[0, 1]] - 0.25).abs() < 1e-6);
    assert_eq!((metadata.rows, metadata.columns), (2, 2));
}

#[test]
fn test_reader_failure() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let reader = MockReader {
        should_fail: true,
        mock_data: None,
    };
    let (pipeline, _) = pipeline(reader, false, ExportConfig::default());

    let result = pipeline.load(file.path());

    assert!(matches!(result.unwrap_err(), DicomError::ParseError(_)));
}

#[test]
fn test_load_rejects_empty_image() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let reader = MockReader {
        should_fail: false,
        mock_data: Some(DicomImageData {
            samples: Array2::zeros((0, 4)),
            metadata: DicomMetadata::default(),
        }),
    };
    let (pipeline, _) = pipeline(reader, false, ExportConfig::default());

    let result = pipeline.load(file.path());

    assert!(matches!(result.unwrap_err(), DicomError::InvalidDimensions(0, 4)));
}

#[test]
fn test_dimension_validation_disabled() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let reader = MockReader {
        should_fail: false,
        mock_data: Some(DicomImageData {
            samples: Array2::zeros((0, 4)),
            metadata: DicomMetadata::default(),
        }),
    };
    let config = ExportConfig::builder().validate_dimensions(false).build();
    let (pipeline, _) = pipeline(reader, false, config);

    assert!(pipeline.load(file.path()).is_ok());
}

#[test]
fn test_encode_denormalizes_float_buffer() {
    let (pipeline, written) = pipeline(ok_reader(), false, ExportConfig::default());
    let buffer = PixelBuffer::from(array![[0.0f32, 0.5], [1.0, 2.0]]);

    let mut output = Cursor::new(Vec::new());
    pipeline
        .encode(&buffer, &DicomMetadata::default(), &mut output)
        .unwrap();

    let written = written.lock().unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].0, array![[0u16, 32768], [65535, 65535]]);
}

#[test]
fn test_encode_passes_u16_buffer_through() {
    let (pipeline, written) = pipeline(ok_reader(), false, ExportConfig::default());
    let samples = array![[1u16, 2, 3]];

    let mut output = Cursor::new(Vec::new());
    pipeline
        .encode(&PixelBuffer::from(samples.clone()), &DicomMetadata::default(), &mut output)
        .unwrap();

    assert_eq!(written.lock().unwrap()[0].0, samples);
}

#[test]
fn test_writer_failure() {
    let (pipeline, _) = pipeline(ok_reader(), true, ExportConfig::default());

    let mut output = Cursor::new(Vec::new());
    let result = pipeline.encode(
        &PixelBuffer::from(array![[0u16]]),
        &DicomMetadata::default(),
        &mut output,
    );

    assert!(matches!(result.unwrap_err(), DicomError::WriteError(_)));
}

#[test]
fn test_save_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("outputs/sub/new/test.dcm");
    let (pipeline, written) = pipeline(ok_reader(), false, ExportConfig::default());

    pipeline
        .save(&PixelBuffer::from(array![[0u16]]), &DicomMetadata::default(), &target)
        .unwrap();

    assert!(target.exists());
    assert_eq!(written.lock().unwrap().len(), 1);
}

#[test]
fn test_save_without_directory_creation_fails() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("missing/test.dcm");
    let config = ExportConfig::builder().create_parent_dirs(false).build();
    let (pipeline, _) = pipeline(ok_reader(), false, config);

    let result = pipeline.save(&PixelBuffer::from(array![[0u16]]), &DicomMetadata::default(), &target);

    assert!(matches!(result.unwrap_err(), DicomError::WriteError(_)));
}

#[test]
fn test_round_trip_carries_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.dcm");
    std::fs::write(&input, b"placeholder").unwrap();
    let reader = MockReader {
        should_fail: false,
        mock_data: Some(DicomImageData {
            samples: array![[0.0, 65535.0]],
            metadata: DicomMetadata {
                patient_id: Some("PAT-1".to_string()),
                rows: 1,
                columns: 2,
                ..DicomMetadata::default()
            },
        }),
    };
    let (pipeline, written) = pipeline(reader, false, ExportConfig::default());

    let metadata = pipeline
        .round_trip(&input, dir.path().join("out/output.dcm"))
        .unwrap();

    assert_eq!(metadata.patient_id.as_deref(), Some("PAT-1"));
    let written = written.lock().unwrap();
    assert_eq!(written[0].0, array![[0u16, 65535]]);
    assert_eq!(written[0].1, metadata);
}

#[test]
fn test_set_config_changes_validation() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let reader = MockReader {
        should_fail: false,
        mock_data: Some(DicomImageData {
            samples: Array2::zeros((4, 0)),
            metadata: DicomMetadata::default(),
        }),
    };
    let (mut pipeline, _) = pipeline(reader, false, ExportConfig::default());
    assert!(pipeline.config().validate_dimensions);
    assert!(matches!(
        pipeline.load(file.path()).unwrap_err(),
        DicomError::InvalidDimensions(4, 0)
    ));

    pipeline.set_config(ExportConfig::builder().validate_dimensions(false).build());

    assert!(!pipeline.config().validate_dimensions);
    assert!(pipeline.load(file.path()).is_ok());
}

#[test]
fn test_save_leaves_existing_file_when_writer_fails() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("existing.dcm");
    std::fs::write(&target, b"previous contents").unwrap();
    let (pipeline, _) = pipeline(ok_reader(), true, ExportConfig::default());

    let result = pipeline.save(&PixelBuffer::from(array![[0u16]]), &DicomMetadata::default(), &target);

    assert!(matches!(result.unwrap_err(), DicomError::WriteError(_)));
    assert_eq!(std::fs::read(&target).unwrap(), b"previous contents");
}
