//! Core types for Minesweeper board recognition.
//!
//! This crate is intentionally small. It holds the lightweight image views the
//! pipeline passes around, the closed set of cell symbols, the board grid and
//! the content histogram used for validation. It does *not* depend on any
//! image decoding library.

mod geometry;
mod grid;
mod histogram;
mod image;
mod logger;
mod symbol;

pub use geometry::{GridAddress, Rect};
pub use grid::{Grid, MISSING_LABEL};
pub use histogram::ContentHistogram;
pub use image::{BinaryImage, GrayImage, GrayImageView, ImageError, RgbImageView};
pub use symbol::{CellSymbol, Digit, CLOSED_LABEL, FLAG_LABEL};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
