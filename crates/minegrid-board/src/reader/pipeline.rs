use log::{info, warn};
use minegrid_classify::{CellClassifier, GlyphRecognizer, Recognition};
use minegrid_core::RgbImageView;
use minegrid_segment::{preprocess, GridSegmenter, Segmentation};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{
    Attempt, BoardReadError, BoardReaderParams, BoardReading, NoopObserver, PipelineObserver,
    ReadState, ReadStatus,
};
use crate::{validate_histogram, ValidationFailure};

/// Loop state; each variant carries what the next step consumes.
enum Stage {
    Segmenting,
    Classifying(Segmentation),
    Validating(Segmentation, Recognition),
    Accepted(Segmentation, Recognition),
    Exhausted(Segmentation, Recognition, ValidationFailure),
}

impl Stage {
    fn state(&self) -> ReadState {
        match self {
            Stage::Segmenting => ReadState::Segmenting,
            Stage::Classifying(..) => ReadState::Classifying,
            Stage::Validating(..) => ReadState::Validating,
            Stage::Accepted(..) => ReadState::Accepted,
            Stage::Exhausted(..) => ReadState::Exhausted,
        }
    }
}

/// Reads Minesweeper boards from screenshots.
pub struct BoardReader<R = Box<dyn GlyphRecognizer>> {
    params: BoardReaderParams,
    segmenter: GridSegmenter,
    classifier: CellClassifier<R>,
}

impl<R: GlyphRecognizer> BoardReader<R> {
    /// Create a reader with the given parameters and glyph recognizer.
    pub fn new(mut params: BoardReaderParams, recognizer: R) -> Self {
        if params.max_attempts == 0 {
            warn!("max_attempts=0 is not usable, running a single attempt");
            params.max_attempts = 1;
        }
        let segmenter = GridSegmenter::new(params.segment.clone());
        let classifier = CellClassifier::new(params.classify.clone(), recognizer);
        Self {
            params,
            segmenter,
            classifier,
        }
    }

    /// Reader parameters.
    #[inline]
    pub fn params(&self) -> &BoardReaderParams {
        &self.params
    }

    #[inline]
    pub fn classifier(&self) -> &CellClassifier<R> {
        &self.classifier
    }

    /// Read one board.
    pub fn read(&self, image: &RgbImageView<'_>) -> Result<BoardReading, BoardReadError> {
        self.read_observed(image, &mut NoopObserver)
    }

    /// Read one board, reporting every stage to `observer`.
    ///
    /// Validation failures never surface as errors: the loop retries with a
    /// larger `min_area` and, once attempts are exhausted, returns the last
    /// grid with [`ReadStatus::Exhausted`].
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image, observer), fields(width = image.width, height = image.height))
    )]
    pub fn read_observed(
        &self,
        image: &RgbImageView<'_>,
        observer: &mut dyn PipelineObserver,
    ) -> Result<BoardReading, BoardReadError> {
        let binary = preprocess(image, &self.params.preprocess)?;
        observer.on_preprocessed(image, &binary);

        let mut attempt = Attempt {
            number: 1,
            min_area: self.params.min_area_initial,
        };
        let mut stage = Stage::Segmenting;

        let reading = loop {
            observer.on_state(attempt, stage.state());
            stage = match stage {
                Stage::Segmenting => {
                    info!(
                        "attempt {}/{}: segmenting with min_area={}",
                        attempt.number, self.params.max_attempts, attempt.min_area
                    );
                    let segmentation = self.segmenter.segment(&binary, attempt.min_area);
                    observer.on_segmented(attempt, &segmentation);
                    Stage::Classifying(segmentation)
                }
                Stage::Classifying(segmentation) => {
                    let recognition = self.classifier.recognize_cells(image, &segmentation)?;
                    observer.on_classified(attempt, &recognition);
                    Stage::Validating(segmentation, recognition)
                }
                Stage::Validating(segmentation, recognition) => {
                    let outcome =
                        validate_histogram(&recognition.histogram, &self.params.validation);
                    observer.on_validated(attempt, &outcome);
                    match outcome {
                        Ok(()) => Stage::Accepted(segmentation, recognition),
                        Err(failure) if attempt.number >= self.params.max_attempts => {
                            Stage::Exhausted(segmentation, recognition, failure)
                        }
                        Err(_) => {
                            attempt = Attempt {
                                number: attempt.number + 1,
                                min_area: self.params.min_area_for_attempt(attempt.number + 1),
                            };
                            warn!(
                                "grid validation failed, retrying with min_area={}",
                                attempt.min_area
                            );
                            Stage::Segmenting
                        }
                    }
                }
                Stage::Accepted(segmentation, recognition) => {
                    info!("grid validated after {} attempt(s)", attempt.number);
                    break finish(segmentation, recognition, attempt, ReadStatus::Accepted);
                }
                Stage::Exhausted(segmentation, recognition, last_failure) => {
                    warn!(
                        "no valid grid after {} attempts ({last_failure}); returning last grid",
                        attempt.number
                    );
                    break finish(
                        segmentation,
                        recognition,
                        attempt,
                        ReadStatus::Exhausted { last_failure },
                    );
                }
            };
        };

        observer.on_finished(&reading);
        Ok(reading)
    }

    /// Read several boards one after another. A failing image does not stop
    /// the batch.
    pub fn read_all<'a>(
        &self,
        images: impl IntoIterator<Item = RgbImageView<'a>>,
    ) -> Vec<Result<BoardReading, BoardReadError>> {
        images
            .into_iter()
            .enumerate()
            .map(|(i, image)| {
                let res = self.read(&image);
                if let Err(err) = &res {
                    warn!("image {i}: {err}");
                }
                res
            })
            .collect()
    }
}

fn finish(
    segmentation: Segmentation,
    recognition: Recognition,
    attempt: Attempt,
    status: ReadStatus,
) -> BoardReading {
    BoardReading {
        grid: recognition.grid,
        histogram: recognition.histogram,
        examples: recognition.examples,
        segmentation,
        attempts: attempt.number,
        status,
    }
}
