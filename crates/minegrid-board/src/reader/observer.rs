use minegrid_classify::Recognition;
use minegrid_core::{BinaryImage, RgbImageView};
use minegrid_segment::Segmentation;
use serde::{Deserialize, Serialize};

use super::BoardReading;
use crate::ValidationFailure;

/// One segment/classify/validate cycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    /// 1-based attempt number.
    pub number: usize,
    pub min_area: f64,
}

/// Reader states. `Accepted` and `Exhausted` are terminal.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadState {
    Segmenting,
    Classifying,
    Validating,
    Accepted,
    Exhausted,
}

/// Receives intermediate results while a board is read.
///
/// Callbacks run synchronously on the reading thread and cannot influence
/// the pipeline. All methods default to no-ops.
pub trait PipelineObserver {
    fn on_preprocessed(&mut self, _image: &RgbImageView<'_>, _binary: &BinaryImage) {}

    fn on_state(&mut self, _attempt: Attempt, _state: ReadState) {}

    fn on_segmented(&mut self, _attempt: Attempt, _segmentation: &Segmentation) {}

    fn on_classified(&mut self, _attempt: Attempt, _recognition: &Recognition) {}

    fn on_validated(&mut self, _attempt: Attempt, _outcome: &Result<(), ValidationFailure>) {}

    fn on_finished(&mut self, _reading: &BoardReading) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

impl<T: PipelineObserver + ?Sized> PipelineObserver for &mut T {
    fn on_preprocessed(&mut self, image: &RgbImageView<'_>, binary: &BinaryImage) {
        (**self).on_preprocessed(image, binary)
    }

    fn on_state(&mut self, attempt: Attempt, state: ReadState) {
        (**self).on_state(attempt, state)
    }

    fn on_segmented(&mut self, attempt: Attempt, segmentation: &Segmentation) {
        (**self).on_segmented(attempt, segmentation)
    }

    fn on_classified(&mut self, attempt: Attempt, recognition: &Recognition) {
        (**self).on_classified(attempt, recognition)
    }

    fn on_validated(&mut self, attempt: Attempt, outcome: &Result<(), ValidationFailure>) {
        (**self).on_validated(attempt, outcome)
    }

    fn on_finished(&mut self, reading: &BoardReading) {
        (**self).on_finished(reading)
    }
}
