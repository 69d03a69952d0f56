//! Pipeline conversions module
//!
//! This module orchestrates loading, rescaling and saving of DICOM images.

mod dicom_round_trip;

#[cfg(test)]
mod tests;

pub use dicom_round_trip::{DicomPipeline, load_dicom, save_dicom};
