use serde::{Deserialize, Serialize};

use crate::CellThreshold;

/// Shape test for flag markers: exactly one external contour whose bounding
/// box aspect ratio lies strictly inside `(aspect_min, aspect_max)`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FlagParams {
    pub aspect_min: f32,
    pub aspect_max: f32,
}

impl Default for FlagParams {
    fn default() -> Self {
        Self {
            aspect_min: 0.2,
            aspect_max: 5.0,
        }
    }
}

/// Parameters for the cell classifier.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifyParams {
    /// Re-thresholding applied to each cropped cell.
    pub cell_threshold: CellThreshold,
    pub flag: FlagParams,
}
