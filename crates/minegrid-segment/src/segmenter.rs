use log::{debug, info};
use minegrid_core::{BinaryImage, GridAddress, Rect};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::contours::{BorderFollower, ContourExtractor};
use crate::SegmentParams;

/// One candidate board cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellRegion {
    /// Bounding box in image coordinates.
    pub rect: Rect,
    /// Enclosed contour area the region was filtered on.
    pub area: f64,
    /// Row/column in the inferred grid.
    pub address: GridAddress,
}

/// Output of one segmentation run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Segmentation {
    /// Regions in reading order (top-to-bottom, then left-to-right).
    pub regions: Vec<CellRegion>,
    pub rows: usize,
    pub cols: usize,
    /// Area threshold this run used.
    pub min_area: f64,
}

impl Segmentation {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Grid segmenter: external contours -> area filter -> boxes -> addresses.
#[derive(Clone, Debug, Default)]
pub struct GridSegmenter<E = BorderFollower> {
    params: SegmentParams,
    extractor: E,
}

impl GridSegmenter<BorderFollower> {
    pub fn new(params: SegmentParams) -> Self {
        Self {
            params,
            extractor: BorderFollower,
        }
    }
}

impl<E: ContourExtractor> GridSegmenter<E> {
    /// Use a different contour source.
    pub fn with_extractor<F: ContourExtractor>(self, extractor: F) -> GridSegmenter<F> {
        GridSegmenter {
            params: self.params,
            extractor,
        }
    }

    pub fn params(&self) -> &SegmentParams {
        &self.params
    }

    /// Segment `binary` keeping contours whose area is strictly above `min_area`.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, binary), fields(width = binary.width, height = binary.height))
    )]
    pub fn segment(&self, binary: &BinaryImage, min_area: f64) -> Segmentation {
        let contours = self.extractor.external_contours(binary);
        let total = contours.len();

        let mut boxes: Vec<(Rect, f64)> = contours
            .iter()
            .filter_map(|c| {
                let area = c.area();
                (area > min_area).then(|| (c.bounding_rect(), area))
            })
            .collect();
        boxes.sort_by(|a, b| reading_order(&a.0, &b.0));

        if boxes.is_empty() {
            info!("no contours above min_area={min_area} (of {total})");
            return Segmentation {
                min_area,
                ..Segmentation::default()
            };
        }

        let rects: Vec<Rect> = boxes.iter().map(|(r, _)| *r).collect();
        let (rows_of, rows) = assign_rows(&rects, self.params.cluster_tolerance_rel);
        let (cols_of, cols) = assign_cols(&rects, self.params.cluster_tolerance_rel);

        let regions: Vec<CellRegion> = boxes
            .into_iter()
            .enumerate()
            .map(|(i, (rect, area))| CellRegion {
                rect,
                area,
                address: GridAddress::new(rows_of[i], cols_of[i]),
            })
            .collect();

        info!(
            "found {} cells (of {total} contours) with rows={rows} cols={cols} at min_area={min_area}",
            regions.len()
        );
        Segmentation {
            regions,
            rows,
            cols,
            min_area,
        }
    }
}

/// Segment with the default contour extractor.
pub fn segment(binary: &BinaryImage, min_area: f64, params: &SegmentParams) -> Segmentation {
    GridSegmenter::new(params.clone()).segment(binary, min_area)
}

/// Top-to-bottom, then left-to-right.
pub fn reading_order(a: &Rect, b: &Rect) -> Ordering {
    (a.y, a.x).cmp(&(b.y, b.x))
}

/// Sort boxes into reading order.
pub fn sort_reading_order(boxes: &mut [Rect]) {
    boxes.sort_by(reading_order);
}

fn assign_rows(rects: &[Rect], tolerance_rel: f32) -> (Vec<usize>, usize) {
    let centers: Vec<f32> = rects.iter().map(|r| r.center().1).collect();
    let tol = tolerance_rel.max(0.0) * median(rects.iter().map(|r| r.height));
    cluster_1d(&centers, tol)
}

fn assign_cols(rects: &[Rect], tolerance_rel: f32) -> (Vec<usize>, usize) {
    let centers: Vec<f32> = rects.iter().map(|r| r.center().0).collect();
    let tol = tolerance_rel.max(0.0) * median(rects.iter().map(|r| r.width));
    cluster_1d(&centers, tol)
}

fn median(values: impl Iterator<Item = usize>) -> f32 {
    let mut v: Vec<usize> = values.collect();
    if v.is_empty() {
        return 0.0;
    }
    v.sort_unstable();
    v[v.len() / 2] as f32
}

/// Group sorted values: a value joins the current cluster while it is within
/// `tol` of the cluster's first value. Cluster ids increase with the value.
fn cluster_1d(values: &[f32], tol: f32) -> (Vec<usize>, usize) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut assignment = vec![0usize; values.len()];
    let mut count = 0usize;
    let mut anchor = f32::NEG_INFINITY;
    for idx in order {
        let v = values[idx];
        if count == 0 || v - anchor > tol {
            count += 1;
            anchor = v;
        }
        assignment[idx] = count - 1;
    }
    debug!("clustered {} values into {count} groups (tol={tol})", values.len());
    (assignment, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(img: &mut BinaryImage, rect: Rect) {
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                img.set(x, y, true);
            }
        }
    }

    fn board(rows: usize, cols: usize, cell: usize, gap: usize) -> BinaryImage {
        let pitch = cell + gap;
        let mut img = BinaryImage::new(gap + cols * pitch, gap + rows * pitch);
        for r in 0..rows {
            for c in 0..cols {
                fill(&mut img, Rect::new(gap + c * pitch, gap + r * pitch, cell, cell));
            }
        }
        img
    }

    #[test]
    fn no_contours_gives_empty_grid() {
        let img = BinaryImage::new(32, 32);
        let seg = segment(&img, 50.0, &SegmentParams::default());
        assert!(seg.is_empty());
        assert_eq!((seg.rows, seg.cols), (0, 0));
    }

    #[test]
    fn everything_below_min_area_gives_empty_grid() {
        let img = board(2, 2, 5, 3);
        let seg = segment(&img, 50.0, &SegmentParams::default());
        assert!(seg.regions.is_empty());
        assert_eq!((seg.rows, seg.cols), (0, 0));
        assert_eq!(seg.min_area, 50.0);
    }

    #[test]
    fn reading_order_of_two_by_two() {
        let mut boxes = vec![
            Rect::new(10, 10, 10, 10),
            Rect::new(0, 10, 10, 10),
            Rect::new(10, 0, 10, 10),
            Rect::new(0, 0, 10, 10),
        ];
        sort_reading_order(&mut boxes);
        let origins: Vec<(usize, usize)> = boxes.iter().map(|b| (b.x, b.y)).collect();
        assert_eq!(origins, vec![(0, 0), (10, 0), (0, 10), (10, 10)]);
    }

    #[test]
    fn uniform_board_gets_row_col_addresses() {
        let img = board(3, 4, 12, 4);
        let seg = segment(&img, 50.0, &SegmentParams::default());
        assert_eq!((seg.rows, seg.cols), (3, 4));
        assert_eq!(seg.regions.len(), 12);
        for (i, region) in seg.regions.iter().enumerate() {
            assert_eq!(region.address, GridAddress::new(i / 4, i % 4));
            assert_eq!(region.rect.width, 12);
        }
    }

    #[test]
    fn jittered_cells_share_rows_with_tolerance() {
        let mut img = BinaryImage::new(60, 40);
        fill(&mut img, Rect::new(2, 2, 12, 12));
        fill(&mut img, Rect::new(18, 3, 12, 12));
        fill(&mut img, Rect::new(34, 2, 12, 12));
        fill(&mut img, Rect::new(3, 18, 12, 12));
        let seg = segment(&img, 50.0, &SegmentParams::default());
        assert_eq!((seg.rows, seg.cols), (2, 3));

        let exact = segment(
            &img,
            50.0,
            &SegmentParams {
                cluster_tolerance_rel: 0.0,
            },
        );
        assert_eq!((exact.rows, exact.cols), (3, 4));
    }

    #[test]
    fn raising_min_area_drops_small_specks() {
        let mut img = board(2, 2, 12, 4);
        let mut wide = BinaryImage::new(img.width, img.height + 10);
        wide.data[..img.data.len()].copy_from_slice(&img.data);
        img = wide;
        fill(&mut img, Rect::new(4, 34, 6, 6));

        let low = segment(&img, 20.0, &SegmentParams::default());
        assert_eq!(low.regions.len(), 5);
        let high = segment(&img, 30.0, &SegmentParams::default());
        assert_eq!(high.regions.len(), 4);
        assert_eq!((high.rows, high.cols), (2, 2));
    }
}
