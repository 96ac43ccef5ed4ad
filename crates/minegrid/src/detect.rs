use std::path::{Path, PathBuf};

use crate::board::{BoardReadError, BoardReader, BoardReading, PipelineObserver};
use crate::classify::GlyphRecognizer;
use crate::core::RgbImageView;
use ::image::{ImageReader, RgbImage};
use log::warn;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: ::image::ImageError,
    },

    #[error(transparent)]
    Board(#[from] BoardReadError),
}

/// Convert an `image::RgbImage` into the lightweight `minegrid-core` view type.
pub fn rgb_view(img: &RgbImage) -> RgbImageView<'_> {
    RgbImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Decode an image file into 8-bit RGB, dropping any alpha channel.
pub fn load_rgb(path: impl AsRef<Path>) -> Result<RgbImage, ReadError> {
    let path = path.as_ref();
    let reader = ImageReader::open(path).map_err(|source| ReadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let img = reader.decode().map_err(|source| ReadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgb8())
}

/// Run the board reader on a decoded screenshot.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(reader, img), fields(width = img.width(), height = img.height()))
)]
pub fn read_board_image<R: GlyphRecognizer>(
    reader: &BoardReader<R>,
    img: &RgbImage,
) -> Result<BoardReading, BoardReadError> {
    reader.read(&rgb_view(img))
}

/// Same as [`read_board_image`], reporting every stage to `observer`.
pub fn read_board_image_observed<R: GlyphRecognizer>(
    reader: &BoardReader<R>,
    img: &RgbImage,
    observer: &mut dyn PipelineObserver,
) -> Result<BoardReading, BoardReadError> {
    reader.read_observed(&rgb_view(img), observer)
}

/// Load and read one screenshot.
pub fn read_board_file<R: GlyphRecognizer>(
    reader: &BoardReader<R>,
    path: impl AsRef<Path>,
) -> Result<BoardReading, ReadError> {
    let img = load_rgb(path)?;
    Ok(read_board_image(reader, &img)?)
}

/// Read several screenshots in order. Every path gets its own result; one
/// unreadable file does not stop the batch.
pub fn read_board_files<R, P>(
    reader: &BoardReader<R>,
    paths: impl IntoIterator<Item = P>,
) -> Vec<(PathBuf, Result<BoardReading, ReadError>)>
where
    R: GlyphRecognizer,
    P: AsRef<Path>,
{
    paths
        .into_iter()
        .map(|p| {
            let path = p.as_ref().to_path_buf();
            let res = read_board_file(reader, &path);
            if let Err(err) = &res {
                warn!("{}: {err}", path.display());
            }
            (path, res)
        })
        .collect()
}
