use minegrid_core::BinaryImage;

/// Errors a glyph recognizer can report.
#[derive(thiserror::Error, Debug)]
pub enum RecognizerError {
    #[error("glyph recognizer unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("glyph recognizer failed: {0}")]
    Failed(String),
}

/// Single-glyph text recognition on a binarized cell crop.
///
/// Implementations return their best guess for one character, or an empty
/// string when nothing was recognized. The classifier trims the result.
pub trait GlyphRecognizer {
    fn recognize_glyph(&self, cell: &BinaryImage) -> Result<String, RecognizerError>;
}

impl<T: GlyphRecognizer + ?Sized> GlyphRecognizer for &T {
    fn recognize_glyph(&self, cell: &BinaryImage) -> Result<String, RecognizerError> {
        (**self).recognize_glyph(cell)
    }
}

impl<T: GlyphRecognizer + ?Sized> GlyphRecognizer for Box<T> {
    fn recognize_glyph(&self, cell: &BinaryImage) -> Result<String, RecognizerError> {
        (**self).recognize_glyph(cell)
    }
}

/// Recognizer that never reads anything; every cell falls through to the
/// flag/closed rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoGlyphs;

impl GlyphRecognizer for NoGlyphs {
    fn recognize_glyph(&self, _cell: &BinaryImage) -> Result<String, RecognizerError> {
        Ok(String::new())
    }
}
