use serde::{Deserialize, Serialize};

use crate::Rect;

/// Errors produced when an image buffer does not describe a usable image.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid image buffer length (expected {expected} bytes, got {got})")]
    InvalidBufferLength { expected: usize, got: usize },
}

/// Borrowed 8-bit RGB image, row-major, 3 bytes per pixel.
#[derive(Clone, Copy, Debug)]
pub struct RgbImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

impl RgbImageView<'_> {
    /// Check dimensions and buffer length.
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.width == 0 || self.height == 0 {
            return Err(ImageError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let expected = self.width * self.height * 3;
        if self.data.len() != expected {
            return Err(ImageError::InvalidBufferLength {
                expected,
                got: self.data.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let idx = (y * self.width + x) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Convert to single-channel intensity (BT.601 weights).
    pub fn to_gray(&self) -> GrayImage {
        let mut data = Vec::with_capacity(self.width * self.height);
        for px in self.data.chunks_exact(3) {
            data.push(luma_bt601(px[0], px[1], px[2]));
        }
        GrayImage {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Crop `rect` (clipped to the image) and convert it to grayscale.
    pub fn crop_gray(&self, rect: Rect) -> GrayImage {
        let rect = rect.clip(self.width, self.height);
        let mut data = Vec::with_capacity(rect.width * rect.height);
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                let [r, g, b] = self.pixel(x, y);
                data.push(luma_bt601(r, g, b));
            }
        }
        GrayImage {
            width: rect.width,
            height: rect.height,
            data,
        }
    }
}

#[inline]
fn luma_bt601(r: u8, g: u8, b: u8) -> u8 {
    // Fixed-point 0.299 R + 0.587 G + 0.114 B, rounded.
    let v = 4899 * r as u32 + 9617 * g as u32 + 1868 * b as u32;
    ((v + (1 << 13)) >> 14) as u8
}

#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

impl GrayImageView<'_> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }
}

/// Foreground/background image. Foreground pixels are stored as 255,
/// background as 0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl BinaryImage {
    pub const ON: u8 = 255;

    /// All-background image.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Inverted global threshold: a pixel is foreground iff `value <= threshold`.
    pub fn threshold_inverted(src: &GrayImageView<'_>, threshold: u8) -> Self {
        let data = src
            .data
            .iter()
            .map(|&v| if v <= threshold { Self::ON } else { 0 })
            .collect();
        Self {
            width: src.width,
            height: src.height,
            data,
        }
    }

    #[inline]
    pub fn is_on(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] != 0
    }

    /// Signed lookup; everything outside the image is background.
    #[inline]
    pub fn is_on_signed(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.is_on(x as usize, y as usize)
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.data[y * self.width + x] = if on { Self::ON } else { 0 };
    }

    pub fn count_on(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Tight bounding box of the foreground, if any.
    pub fn foreground_bounds(&self) -> Option<Rect> {
        let mut min_x = usize::MAX;
        let mut min_y = usize::MAX;
        let mut max_x = 0;
        let mut max_y = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.is_on(x, y) {
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                }
            }
        }
        (min_x != usize::MAX).then(|| Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        let data = [0u8; 10];
        let view = RgbImageView {
            width: 2,
            height: 2,
            data: &data,
        };
        assert_eq!(
            view.validate(),
            Err(ImageError::InvalidBufferLength {
                expected: 12,
                got: 10
            })
        );
    }

    #[test]
    fn rejects_empty_image() {
        let view = RgbImageView {
            width: 0,
            height: 4,
            data: &[],
        };
        assert!(matches!(
            view.validate(),
            Err(ImageError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn gray_conversion_matches_bt601() {
        let data = [255, 255, 255, 0, 0, 0, 255, 0, 0, 0, 255, 0];
        let view = RgbImageView {
            width: 4,
            height: 1,
            data: &data,
        };
        let gray = view.to_gray();
        assert_eq!(gray.data, vec![255, 0, 76, 150]);
    }

    #[test]
    fn threshold_is_inclusive_and_inverted() {
        let data = [0u8, 128, 129, 255];
        let view = GrayImageView {
            width: 4,
            height: 1,
            data: &data,
        };
        let bin = BinaryImage::threshold_inverted(&view, 128);
        assert_eq!(bin.data, vec![255, 255, 0, 0]);
    }

    #[test]
    fn foreground_bounds_of_blob() {
        let mut bin = BinaryImage::new(6, 5);
        bin.set(2, 1, true);
        bin.set(4, 3, true);
        assert_eq!(bin.foreground_bounds(), Some(Rect::new(2, 1, 3, 3)));
        assert_eq!(BinaryImage::new(3, 3).foreground_bounds(), None);
    }
}
