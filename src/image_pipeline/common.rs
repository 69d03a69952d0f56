//! Common utilities module
//!
//! This module contains the error taxonomy shared by the reading and writing halves.

pub mod error;

pub use error::{DicomError, Result};
