//! Board screenshot segmentation built on top of `minegrid-core`.
//!
//! ## Quickstart
//!
//! ```
//! use minegrid_core::RgbImageView;
//! use minegrid_segment::{preprocess, GridSegmenter, PreprocessParams, SegmentParams};
//!
//! let data = vec![255u8; 16 * 16 * 3];
//! let image = RgbImageView { width: 16, height: 16, data: &data };
//! let binary = preprocess(&image, &PreprocessParams::default()).unwrap();
//! let seg = GridSegmenter::new(SegmentParams::default()).segment(&binary, 50.0);
//! assert_eq!((seg.rows, seg.cols), (0, 0));
//! ```
//!
//! Algorithm:
//! 1. Grayscale, 5×5 binomial smoothing, inverted global threshold.
//! 2. External contours of 8-connected foreground components.
//! 3. Drop contours whose enclosed area is not above `min_area`.
//! 4. Bounding boxes in reading order.
//! 5. Cluster box centers along each axis; cluster indices are the
//!    (row, col) address of each region and the cluster counts the grid size.

mod contours;
mod params;
mod preprocess;
mod segmenter;

pub use contours::{BorderFollower, Contour, ContourExtractor};
pub use params::{PreprocessParams, SegmentParams};
pub use preprocess::{blur_5x5, preprocess, PreprocessError};
pub use segmenter::{
    reading_order, segment, sort_reading_order, CellRegion, GridSegmenter, Segmentation,
};
