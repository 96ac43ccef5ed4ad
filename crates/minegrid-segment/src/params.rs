use serde::{Deserialize, Serialize};

/// Parameters for turning a screenshot into a binary image.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PreprocessParams {
    /// Global intensity threshold; pixels at or below it become foreground.
    pub threshold: u8,
    /// Apply the fixed 5×5 smoothing kernel before thresholding.
    pub blur: bool,
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            threshold: 128,
            blur: true,
        }
    }
}

/// Parameters for grouping cell boxes into rows and columns.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SegmentParams {
    /// Maximal distance between box centers sharing a row (column), relative
    /// to the median cell height (width).
    ///
    /// `0.0` only groups boxes with identical centers.
    pub cluster_tolerance_rel: f32,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            cluster_tolerance_rel: 0.5,
        }
    }
}
