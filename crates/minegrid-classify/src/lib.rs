//! Cell classification for board screenshots.
//!
//! Each cell region is cropped from the color screenshot, re-thresholded on
//! its own and decided in priority order:
//! 1. a [`GlyphRecognizer`] reads exactly one character `1`..`8` -> digit,
//! 2. the cell holds exactly one external contour of moderate aspect ratio
//!    -> flag,
//! 3. anything else -> closed.
//!
//! The glyph recognizer is pluggable. [`TemplateRecognizer`] ships with this
//! crate and matches 8×8 glyph codes against templates learned from a
//! labelled calibration board.

mod classifier;
mod params;
mod recognizer;
mod template;
mod threshold;

pub use classifier::{is_flag, CellClassifier, ClassifyError, Recognition};
pub use params::{ClassifyParams, FlagParams};
pub use recognizer::{GlyphRecognizer, NoGlyphs, RecognizerError};
pub use template::{
    GlyphCode, GlyphTemplate, TemplateIoError, TemplateMatch, TemplateRecognizer, GLYPH_BITS,
};
pub use threshold::CellThreshold;
