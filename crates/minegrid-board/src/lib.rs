//! Minesweeper board reading.
//!
//! Current focus:
//! - one segment/classify/validate cycle per attempt,
//! - bounded retry with a growing contour `min_area`,
//! - histogram validation against board-level rules,
//! - JSON config and reports for batch runs.
//!
//! Segmentation lives in `minegrid-segment`, cell classification and glyph
//! recognizers in `minegrid-classify`.

mod io;
mod reader;
mod validation;

pub use io::{BoardIoError, BoardReadConfig, BoardReadReport, ImageReport};
pub use reader::{
    Attempt, BoardReadError, BoardReader, BoardReaderParams, BoardReading, NoopObserver,
    PipelineObserver, ReadState, ReadStatus,
};
pub use validation::{validate, validate_histogram, ValidationFailure, ValidationRules};

pub use minegrid_core::{CellSymbol, ContentHistogram, Grid, GridAddress};
