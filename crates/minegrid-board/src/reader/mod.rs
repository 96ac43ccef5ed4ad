//! Board reading pipeline.
//!
//! This module wires together preprocessing, grid segmentation, per-cell
//! classification and histogram validation, retrying segmentation with a
//! larger `min_area` until the board validates or attempts run out.

mod error;
mod observer;
mod params;
mod pipeline;
mod result;

pub use error::BoardReadError;
pub use observer::{Attempt, NoopObserver, PipelineObserver, ReadState};
pub use params::BoardReaderParams;
pub use pipeline::BoardReader;
pub use result::{BoardReading, ReadStatus};
