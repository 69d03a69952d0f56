use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DicomError {
    #[error("DICOM file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to parse DICOM file: {0}")]
    ParseError(String),

    #[error("Failed to write DICOM file: {0}")]
    WriteError(String),

    #[error("Invalid image dimensions: rows={0}, columns={1}")]
    InvalidDimensions(usize, usize),

    #[error("Unsupported pixel encoding: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DicomError>;
