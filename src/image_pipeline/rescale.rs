//! Intensity rescaling helpers
//!
//! Maps raw pixel samples to the normalized `[0, 1]` range used by processing
//! code, and back to unsigned 16-bit samples for storage.

use std::borrow::Cow;

use ndarray::Array2;

/// Added to the intensity range so constant-valued buffers never divide by zero.
pub const NORMALIZATION_EPSILON: f32 = 1e-8;

/// Largest sample value of the denormalized representation.
const U16_SCALE: f32 = u16::MAX as f32;

/// Pixel buffer handed to the writer.
///
/// Processing pipelines usually produce normalized floats; buffers that are
/// already 16-bit are written untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBuffer {
    /// Intensities in `[0, 1]` (out-of-range values are clamped on write)
    Normalized(Array2<f32>),
    /// Unsigned 16-bit samples, written as-is
    Samples(Array2<u16>),
}

impl PixelBuffer {
    /// Returns `(rows, columns)`.
    pub fn dim(&self) -> (usize, usize) {
        match self {
            PixelBuffer::Normalized(pixels) => pixels.dim(),
            PixelBuffer::Samples(pixels) => pixels.dim(),
        }
    }

    /// Returns the buffer as 16-bit samples, denormalizing floats first.
    pub fn to_samples(&self) -> Cow<'_, Array2<u16>> {
        match self {
            PixelBuffer::Normalized(pixels) => Cow::Owned(denormalize(pixels)),
            PixelBuffer::Samples(pixels) => Cow::Borrowed(pixels),
        }
    }
}

impl From<Array2<f32>> for PixelBuffer {
    fn from(pixels: Array2<f32>) -> Self {
        PixelBuffer::Normalized(pixels)
    }
}

impl From<Array2<u16>> for PixelBuffer {
    fn from(pixels: Array2<u16>) -> Self {
        PixelBuffer::Samples(pixels)
    }
}

/// Maps the buffer's observed range onto `[0, 1]`.
///
/// `normalized = (raw - min) / (max - min + NORMALIZATION_EPSILON)`
///
/// Since `min` and `max` come from the buffer itself every output lies in
/// `[0, 1]`; a constant buffer maps to all zeros.
pub fn normalize(raw: &Array2<f32>) -> Array2<f32> {
    if raw.is_empty() {
        return raw.clone();
    }

    let (min, max) = raw
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min + NORMALIZATION_EPSILON;

    raw.mapv(|v| (v - min) / range)
}

/// Converts a normalized buffer to unsigned 16-bit samples.
///
/// Values are clamped to `[0, 1]`, scaled by 65535 and rounded to the nearest
/// integer. NaN maps to 0.
pub fn denormalize(normalized: &Array2<f32>) -> Array2<u16> {
    normalized.mapv(|v| (v.clamp(0.0, 1.0) * U16_SCALE).round() as u16)
}
