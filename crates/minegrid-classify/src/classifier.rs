use std::collections::BTreeMap;

use log::{debug, info, warn};
use minegrid_core::{
    BinaryImage, CellSymbol, ContentHistogram, Digit, Grid, GridAddress, Rect, RgbImageView,
};
use minegrid_segment::{BorderFollower, CellRegion, ContourExtractor, Segmentation};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{ClassifyParams, FlagParams, GlyphRecognizer, RecognizerError};

/// Errors returned by the cell classifier.
#[derive(thiserror::Error, Debug)]
pub enum ClassifyError {
    #[error("glyph recognition failed for cell {address:?} at {rect:?}")]
    Recognizer {
        address: GridAddress,
        rect: Rect,
        #[source]
        source: RecognizerError,
    },
}

/// Result of one classification pass over all regions.
#[derive(Clone, Debug, PartialEq)]
pub struct Recognition {
    pub grid: Grid,
    pub histogram: ContentHistogram,
    /// First binarized crop seen for each label; diagnostics only.
    pub examples: BTreeMap<String, BinaryImage>,
}

/// Decides the symbol of each cell: digit, then flag, then closed.
#[derive(Clone, Debug)]
pub struct CellClassifier<R, E = BorderFollower> {
    params: ClassifyParams,
    recognizer: R,
    extractor: E,
}

impl<R: GlyphRecognizer> CellClassifier<R, BorderFollower> {
    pub fn new(params: ClassifyParams, recognizer: R) -> Self {
        Self {
            params,
            recognizer,
            extractor: BorderFollower,
        }
    }
}

impl<R: GlyphRecognizer, E: ContourExtractor> CellClassifier<R, E> {
    /// Use a different contour source for the flag test.
    pub fn with_extractor<F: ContourExtractor>(self, extractor: F) -> CellClassifier<R, F> {
        CellClassifier {
            params: self.params,
            recognizer: self.recognizer,
            extractor,
        }
    }

    pub fn params(&self) -> &ClassifyParams {
        &self.params
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    /// Crop `rect` from the color image, convert to gray and re-threshold it.
    pub fn binarize(&self, image: &RgbImageView<'_>, rect: Rect) -> BinaryImage {
        let gray = image.crop_gray(rect);
        self.params.cell_threshold.apply(&gray.view())
    }

    /// Classify an already binarized cell.
    pub fn classify_cell(&self, cell: &BinaryImage) -> Result<CellSymbol, RecognizerError> {
        self.decide(cell).map(|(symbol, _)| symbol)
    }

    /// Classify one region of `image`.
    pub fn classify(
        &self,
        image: &RgbImageView<'_>,
        region: &CellRegion,
    ) -> Result<CellSymbol, ClassifyError> {
        let cell = self.binarize(image, region.rect);
        self.classify_cell(&cell)
            .map_err(|source| ClassifyError::Recognizer {
                address: region.address,
                rect: region.rect,
                source,
            })
    }

    /// Classify every region and fold the results into a grid, a histogram
    /// and one example crop per label.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image, segmentation), fields(cells = segmentation.regions.len()))
    )]
    pub fn recognize_cells(
        &self,
        image: &RgbImageView<'_>,
        segmentation: &Segmentation,
    ) -> Result<Recognition, ClassifyError> {
        info!("recognizing {} cells", segmentation.regions.len());
        let mut grid = Grid::new(segmentation.rows, segmentation.cols);
        let mut histogram = ContentHistogram::new();
        let mut examples = BTreeMap::new();

        for region in &segmentation.regions {
            let cell = self.binarize(image, region.rect);
            let (symbol, text) =
                self.decide(&cell)
                    .map_err(|source| ClassifyError::Recognizer {
                        address: region.address,
                        rect: region.rect,
                        source,
                    })?;
            debug!(
                "cell at ({},{}): {:?} -> {}",
                region.address.row, region.address.col, text, symbol
            );

            if !grid.set(region.address, symbol) {
                warn!(
                    "cell address ({},{}) outside {}x{} grid",
                    region.address.row,
                    region.address.col,
                    grid.rows(),
                    grid.cols()
                );
            }
            histogram.add(symbol);
            examples.entry(symbol.label()).or_insert(cell);
        }

        info!("cell contents: {histogram}");
        Ok(Recognition {
            grid,
            histogram,
            examples,
        })
    }

    fn decide(&self, cell: &BinaryImage) -> Result<(CellSymbol, String), RecognizerError> {
        if cell.width == 0 || cell.height == 0 {
            return Ok((CellSymbol::Closed, String::new()));
        }

        let raw = self.recognizer.recognize_glyph(cell)?;
        let text = raw.trim();
        let symbol = if let Some(d) = Digit::from_label(text) {
            CellSymbol::Digit(d)
        } else if is_flag(cell, &self.extractor, &self.params.flag) {
            CellSymbol::Flag
        } else {
            CellSymbol::Closed
        };
        Ok((symbol, text.to_string()))
    }
}

/// Exactly one external contour with an aspect ratio strictly inside the
/// configured range.
pub fn is_flag<E: ContourExtractor>(cell: &BinaryImage, extractor: &E, params: &FlagParams) -> bool {
    let contours = extractor.external_contours(cell);
    let [contour] = contours.as_slice() else {
        return false;
    };
    let aspect = contour.bounding_rect().aspect_ratio();
    aspect > params.aspect_min && aspect < params.aspect_max
}
