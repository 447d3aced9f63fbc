//! Video frame types and processing

use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::FrameError;

/// Channel order of an interleaved 3-channel frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Blue, green, red (camera and decoder default)
    #[default]
    Bgr24,
    /// Red, green, blue
    Rgb24,
}

impl PixelFormat {
    /// Byte offsets of (red, green, blue) within one pixel
    fn rgb_offsets(self) -> (usize, usize, usize) {
        match self {
            PixelFormat::Bgr24 => (2, 1, 0),
            PixelFormat::Rgb24 => (0, 1, 2),
        }
    }
}

/// Decoded 3-channel video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Interleaved pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Channel order of `data`
    pub format: PixelFormat,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new BGR video frame from raw data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            format: PixelFormat::Bgr24,
            timestamp_ns,
            sequence,
        }
    }

    /// Create an untimed BGR frame
    pub fn from_bgr(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self::new(data, width, height, 0, 0)
    }

    /// Override the channel order
    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    /// Expected buffer length for the frame's dimensions
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    /// Check that the frame has a non-zero extent and a buffer matching it
    pub fn validate(&self) -> Result<(), FrameError> {
        if self.width == 0 || self.height == 0 {
            return Err(FrameError::Empty {
                width: self.width,
                height: self.height,
            });
        }

        let expected = self.expected_len();
        if self.data.len() != expected {
            return Err(FrameError::BufferLength {
                width: self.width,
                height: self.height,
                expected,
                actual: self.data.len(),
            });
        }

        Ok(())
    }

    /// Get pixel at (x, y) in the frame's own channel order
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        let px = self.data.get(idx..idx + 3)?;
        Some([px[0], px[1], px[2]])
    }

    /// Convert to a single-channel luminance image
    pub fn to_grayscale(&self) -> GrayImage {
        let (r, g, b) = self.format.rgb_offsets();
        let gray: Vec<u8> = self
            .data
            .chunks_exact(3)
            .map(|pixel| {
                // Luminance formula: 0.299*R + 0.587*G + 0.114*B
                let y = pixel[r] as f32 * 0.299 + pixel[g] as f32 * 0.587 + pixel[b] as f32 * 0.114;
                y.round().clamp(0.0, 255.0) as u8
            })
            .collect();

        GrayImage::from_raw(self.width, self.height, gray)
            .unwrap_or_else(|| GrayImage::new(self.width, self.height))
    }

    /// Crop a region of the frame
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Result<VideoFrame, FrameError> {
        let out_of_bounds = x.checked_add(w).map_or(true, |right| right > self.width)
            || y.checked_add(h).map_or(true, |bottom| bottom > self.height);
        if out_of_bounds {
            return Err(FrameError::CropOutOfBounds {
                x,
                y,
                w,
                h,
                width: self.width,
                height: self.height,
            });
        }

        let stride = self.width as usize * 3;
        let mut cropped = Vec::with_capacity(w as usize * h as usize * 3);
        for row in y..(y + h) {
            let start = row as usize * stride + x as usize * 3;
            let end = start + w as usize * 3;
            cropped.extend_from_slice(&self.data[start..end]);
        }

        trace!(x, y, w, h, "cropped frame {}", self.sequence);

        Ok(VideoFrame {
            data: cropped,
            width: w,
            height: h,
            format: self.format,
            timestamp_ns: self.timestamp_ns,
            sequence: self.sequence,
        })
    }

    /// Rows `[top, height)` across the full width; empty when `top >= height`
    pub fn rows_from(&self, top: u32) -> VideoFrame {
        let top = top.min(self.height);
        self.crop(0, top, self.width, self.height - top)
            .unwrap_or_else(|_| VideoFrame {
                data: Vec::new(),
                width: self.width,
                height: 0,
                format: self.format,
                timestamp_ns: self.timestamp_ns,
                sequence: self.sequence,
            })
    }
}

impl From<RgbImage> for VideoFrame {
    fn from(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height, 0, 0).with_format(PixelFormat::Rgb24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gradient_frame(width: u32, height: u32) -> VideoFrame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, y as u8, (x + y) as u8]);
            }
        }
        VideoFrame::from_bgr(data, width, height)
    }

    #[test]
    fn test_validate_accepts_matching_buffer() {
        let frame = gradient_frame(8, 4);
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_extent() {
        let frame = VideoFrame::from_bgr(Vec::new(), 0, 10);
        assert_eq!(
            frame.validate(),
            Err(FrameError::Empty { width: 0, height: 10 })
        );
    }

    #[test]
    fn test_validate_rejects_short_buffer() {
        let frame = VideoFrame::from_bgr(vec![0; 10], 2, 2);
        assert!(matches!(
            frame.validate(),
            Err(FrameError::BufferLength { expected: 12, actual: 10, .. })
        ));
    }

    #[test]
    fn test_grayscale_respects_channel_order() {
        // Pure red in each layout
        let bgr = VideoFrame::from_bgr(vec![0, 0, 255], 1, 1);
        let rgb = VideoFrame::from_bgr(vec![255, 0, 0], 1, 1).with_format(PixelFormat::Rgb24);

        assert_eq!(bgr.to_grayscale().get_pixel(0, 0)[0], 76);
        assert_eq!(rgb.to_grayscale().get_pixel(0, 0)[0], 76);
    }

    #[test]
    fn test_rows_from_past_bottom_is_empty() {
        let frame = gradient_frame(6, 5);
        let roi = frame.rows_from(9);
        assert_eq!(roi.height, 0);
        assert_eq!(roi.width, 6);
        assert!(roi.data.is_empty());
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let frame = gradient_frame(6, 5);
        assert!(frame.crop(4, 0, 3, 1).is_err());
        assert!(frame.crop(0, 0, 6, 5).is_ok());
    }

    proptest! {
        #[test]
        fn rows_from_keeps_bottom_rows(width in 1u32..24, height in 1u32..24, top in 0u32..30) {
            let frame = gradient_frame(width, height);
            let roi = frame.rows_from(top);
            let top = top.min(height);

            prop_assert_eq!(roi.height, height - top);
            prop_assert_eq!(roi.data.len(), roi.expected_len());
            for y in 0..roi.height {
                for x in 0..width {
                    prop_assert_eq!(roi.get_pixel(x, y), frame.get_pixel(x, y + top));
                }
            }
        }
    }
}
