use minegrid_classify::ClassifyError;
use minegrid_segment::PreprocessError;

/// Errors that abort reading one image.
///
/// Validation failures are not errors: they drive the retry loop and end up
/// in [`crate::ReadStatus::Exhausted`] when attempts run out.
#[derive(thiserror::Error, Debug)]
pub enum BoardReadError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),
    #[error(transparent)]
    Classify(#[from] ClassifyError),
}
