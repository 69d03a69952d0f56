//! DICOM reading module
//!
//! This module decodes single-frame monochrome DICOM files into raw samples
//! and descriptive metadata.

mod reader;
mod object_reader;
pub mod types;

pub use reader::DicomReader;
pub use object_reader::{ObjectDicomReader, decode_object};
pub use types::{DicomImageData, DicomMetadata};
