//! Road Frame Library
//!
//! Decoded frames from the road-facing camera, as handed to the lane detector.
//! Supports:
//! - BGR and RGB interleaved 8-bit layouts
//! - Shape validation before any processing
//! - Row-range cropping for region-of-interest selection
//! - Luminance conversion to a single-channel image

pub mod frame;

pub use frame::{PixelFormat, VideoFrame};

use thiserror::Error;

/// Frame error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Frame has zero extent: {width}x{height}")]
    Empty { width: u32, height: u32 },

    #[error("Buffer length {actual} does not match {width}x{height}x3 = {expected}")]
    BufferLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Crop {w}x{h} at ({x}, {y}) exceeds {width}x{height} frame")]
    CropOutOfBounds {
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        width: u32,
        height: u32,
    },
}
