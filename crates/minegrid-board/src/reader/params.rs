use minegrid_classify::ClassifyParams;
use minegrid_segment::{PreprocessParams, SegmentParams};
use serde::{Deserialize, Serialize};

use crate::ValidationRules;

/// Configuration for the board reader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardReaderParams {
    /// `min_area` used by the first segmentation attempt.
    pub min_area_initial: f64,
    /// Added to `min_area` after each failed validation.
    pub min_area_step: f64,
    /// Hard cap on segment/classify/validate cycles per image.
    pub max_attempts: usize,
    pub preprocess: PreprocessParams,
    pub segment: SegmentParams,
    pub classify: ClassifyParams,
    pub validation: ValidationRules,
}

impl Default for BoardReaderParams {
    fn default() -> Self {
        Self {
            min_area_initial: 50.0,
            min_area_step: 10.0,
            max_attempts: 10,
            preprocess: PreprocessParams::default(),
            segment: SegmentParams::default(),
            classify: ClassifyParams::default(),
            validation: ValidationRules::default(),
        }
    }
}

impl BoardReaderParams {
    /// `min_area` for a 1-based attempt number.
    pub fn min_area_for_attempt(&self, attempt: usize) -> f64 {
        self.min_area_initial + self.min_area_step * attempt.saturating_sub(1) as f64
    }
}
