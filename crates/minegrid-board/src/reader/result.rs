use std::collections::BTreeMap;

use minegrid_core::{BinaryImage, ContentHistogram, Grid};
use minegrid_segment::Segmentation;
use serde::{Deserialize, Serialize};

use crate::ValidationFailure;

/// How the retry loop ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ReadStatus {
    /// The last grid passed validation.
    Accepted,
    /// Attempts ran out; the grid is the last, unvalidated one.
    Exhausted { last_failure: ValidationFailure },
}

/// Output of reading one board image.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardReading {
    pub grid: Grid,
    pub histogram: ContentHistogram,
    /// First binarized crop per label from the final attempt.
    pub examples: BTreeMap<String, BinaryImage>,
    /// Segmentation of the final attempt.
    pub segmentation: Segmentation,
    /// Number of attempts used (1-based).
    pub attempts: usize,
    pub status: ReadStatus,
}

impl BoardReading {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        self.status == ReadStatus::Accepted
    }

    /// `min_area` used by the final attempt.
    #[inline]
    pub fn min_area(&self) -> f64 {
        self.segmentation.min_area
    }
}
