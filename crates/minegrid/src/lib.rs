//! High-level facade crate for the `minegrid-*` workspace.
//!
//! This crate provides:
//! - re-exports of the underlying pipeline crates,
//! - (feature-gated) helpers that decode screenshots with `image` and run the
//!   board reader on them, a Tesseract glyph recognizer and a diagnostics
//!   observer that dumps intermediate images,
//! - the `minegrid` command-line tool (feature `cli`).
//!
//! ## Quickstart
//!
//! ```no_run
//! use minegrid::board::{BoardReader, BoardReaderParams};
//! use minegrid::classify::TemplateRecognizer;
//! use minegrid::detect;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let templates = TemplateRecognizer::load_json("templates.json")?;
//! let reader = BoardReader::new(BoardReaderParams::default(), templates);
//! let reading = detect::read_board_file(&reader, "board.png")?;
//! println!("{}", reading.grid);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `minegrid::core`: images, cell symbols, grids, histograms, logging.
//! - `minegrid::segment`: preprocessing, contours and grid segmentation.
//! - `minegrid::classify`: cell classification and glyph recognizers.
//! - `minegrid::board`: validation, the retrying reader, JSON config/report.
//! - `minegrid::detect` (feature `image`): end-to-end helpers from files or
//!   `image::RgbImage`.

pub use minegrid_board as board;
pub use minegrid_classify as classify;
pub use minegrid_core as core;
pub use minegrid_segment as segment;

pub use minegrid_board::{BoardReader, BoardReaderParams, BoardReading, ReadStatus};
pub use minegrid_core::{CellSymbol, Grid, GridAddress};

#[cfg(feature = "image")]
pub mod detect;
#[cfg(feature = "image")]
mod diagnostics;
#[cfg(feature = "image")]
mod tesseract;

#[cfg(feature = "image")]
pub use diagnostics::DiagnosticsWriter;
#[cfg(feature = "image")]
pub use tesseract::TesseractRecognizer;
