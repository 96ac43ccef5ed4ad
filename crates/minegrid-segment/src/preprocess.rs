//! Screenshot normalization: grayscale, smoothing, inverted global threshold.

use log::debug;
use minegrid_core::{BinaryImage, GrayImage, GrayImageView, ImageError, RgbImageView};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::PreprocessParams;

/// Errors returned by [`preprocess`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PreprocessError {
    #[error("invalid image: {0}")]
    InvalidImage(#[from] ImageError),
}

/// 5-tap binomial kernel, sums to 16.
const KERNEL: [u32; 5] = [1, 4, 6, 4, 1];

/// Convert a screenshot into a binary image where dark strokes are foreground.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(image, params), fields(width = image.width, height = image.height))
)]
pub fn preprocess(
    image: &RgbImageView<'_>,
    params: &PreprocessParams,
) -> Result<BinaryImage, PreprocessError> {
    image.validate()?;

    let gray = image.to_gray();
    let gray = if params.blur {
        blur_5x5(&gray.view())
    } else {
        gray
    };
    let binary = BinaryImage::threshold_inverted(&gray.view(), params.threshold);

    debug!(
        "preprocessed {}x{} image: {} foreground pixels (threshold {})",
        binary.width,
        binary.height,
        binary.count_on(),
        params.threshold
    );
    Ok(binary)
}

/// Separable 5×5 binomial blur with reflect-101 borders.
pub fn blur_5x5(src: &GrayImageView<'_>) -> GrayImage {
    let (w, h) = (src.width, src.height);
    let mut tmp = vec![0u32; w * h];

    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u32;
            for (k, &weight) in KERNEL.iter().enumerate() {
                let sx = reflect101(x as isize + k as isize - 2, w);
                acc += weight * src.get(sx, y) as u32;
            }
            tmp[y * w + x] = acc;
        }
    }

    let mut data = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u32;
            for (k, &weight) in KERNEL.iter().enumerate() {
                let sy = reflect101(y as isize + k as isize - 2, h);
                acc += weight * tmp[sy * w + x];
            }
            data[y * w + x] = ((acc + 128) >> 8) as u8;
        }
    }

    GrayImage {
        width: w,
        height: h,
        data,
    }
}

/// Border index mapping `gfedcb|abcdefgh|gfedcba`.
fn reflect101(i: isize, n: usize) -> usize {
    let n = n as isize;
    if n <= 1 {
        return 0;
    }
    let mut i = i;
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * n - 2 - i;
        } else {
            return i as usize;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_from_gray(width: usize, height: usize, gray: &[u8]) -> Vec<u8> {
        assert_eq!(gray.len(), width * height);
        gray.iter().flat_map(|&v| [v, v, v]).collect()
    }

    #[test]
    fn reflect101_mirrors_without_repeating_edge() {
        assert_eq!(reflect101(-1, 5), 1);
        assert_eq!(reflect101(-2, 5), 2);
        assert_eq!(reflect101(5, 5), 3);
        assert_eq!(reflect101(6, 5), 2);
        assert_eq!(reflect101(3, 1), 0);
    }

    #[test]
    fn blur_keeps_flat_image_flat() {
        let data = vec![77u8; 9 * 7];
        let view = GrayImageView {
            width: 9,
            height: 7,
            data: &data,
        };
        assert!(blur_5x5(&view).data.iter().all(|&v| v == 77));
    }

    #[test]
    fn dark_square_survives_blur_without_growing() {
        let (w, h) = (20, 20);
        let mut gray = vec![255u8; w * h];
        for y in 5..15 {
            for x in 5..15 {
                gray[y * w + x] = 0;
            }
        }
        let rgb = rgb_from_gray(w, h, &gray);
        let view = RgbImageView {
            width: w,
            height: h,
            data: &rgb,
        };
        let bin = preprocess(&view, &PreprocessParams::default()).expect("valid image");
        let bounds = bin.foreground_bounds().expect("foreground");
        assert_eq!(bounds, minegrid_core::Rect::new(5, 5, 10, 10));
        assert!(bin.is_on(10, 10));
        assert!(!bin.is_on(4, 10));
    }

    #[test]
    fn invalid_buffer_is_reported() {
        let view = RgbImageView {
            width: 4,
            height: 4,
            data: &[0u8; 5],
        };
        let err = preprocess(&view, &PreprocessParams::default()).unwrap_err();
        assert!(matches!(err, PreprocessError::InvalidImage(_)));
    }

    #[test]
    fn preprocessing_is_deterministic() {
        let gray: Vec<u8> = (0..64u32).map(|v| (v * 4) as u8).collect();
        let rgb = rgb_from_gray(8, 8, &gray);
        let view = RgbImageView {
            width: 8,
            height: 8,
            data: &rgb,
        };
        let a = preprocess(&view, &PreprocessParams::default()).unwrap();
        let b = preprocess(&view, &PreprocessParams::default()).unwrap();
        assert_eq!(a, b);
    }
}
