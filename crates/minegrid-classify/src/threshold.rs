//! Per-cell binarization.

use minegrid_core::{BinaryImage, GrayImageView};
use serde::{Deserialize, Serialize};

/// How a cropped cell is re-thresholded before recognition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellThreshold {
    /// Inverted threshold at a fixed intensity.
    Fixed(u8),
    /// Inverted threshold at the Otsu level of the cell's own histogram.
    Otsu,
}

impl Default for CellThreshold {
    fn default() -> Self {
        CellThreshold::Fixed(128)
    }
}

impl CellThreshold {
    pub fn level(&self, cell: &GrayImageView<'_>) -> u8 {
        match *self {
            CellThreshold::Fixed(t) => t,
            CellThreshold::Otsu => otsu_threshold(cell.data),
        }
    }

    /// Foreground = pixels at or below the level.
    pub fn apply(&self, cell: &GrayImageView<'_>) -> BinaryImage {
        BinaryImage::threshold_inverted(cell, self.level(cell))
    }
}

/// Otsu threshold of a set of intensities.
///
/// Degenerate inputs: empty -> 127, flat -> that value, two levels -> midpoint.
pub(crate) fn otsu_threshold(samples: &[u8]) -> u8 {
    if samples.is_empty() {
        return 127;
    }

    let mut hist = [0u32; 256];
    for &v in samples {
        hist[v as usize] += 1;
    }
    let min_v = hist.iter().position(|&h| h > 0).unwrap_or(0) as u8;
    let max_v = hist.iter().rposition(|&h| h > 0).unwrap_or(255) as u8;
    if min_v == max_v {
        return min_v;
    }
    if hist.iter().filter(|&&h| h > 0).count() <= 2 {
        return ((min_v as u16 + max_v as u16) / 2) as u8;
    }

    let total = samples.len() as f64;
    let sum_total: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &h)| i as f64 * h as f64)
        .sum();

    let mut sum_b = 0f64;
    let mut w_b = 0f64;
    let mut best_var = -1f64;
    let mut best_t = 127u8;

    for (t, &h) in hist.iter().enumerate() {
        w_b += h as f64;
        if w_b < 1.0 {
            continue;
        }
        let w_f = total - w_b;
        if w_f < 1.0 {
            break;
        }

        sum_b += t as f64 * h as f64;
        let m_b = sum_b / w_b;
        let m_f = (sum_total - sum_b) / w_f;

        let var_between = w_b * w_f * (m_b - m_f) * (m_b - m_f);
        if var_between > best_var {
            best_var = var_between;
            best_t = t as u8;
        }
    }

    best_t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otsu_degenerate_inputs() {
        assert_eq!(otsu_threshold(&[]), 127);
        assert_eq!(otsu_threshold(&[42, 42, 42]), 42);
        assert_eq!(otsu_threshold(&[10, 200, 10]), 105);
    }

    #[test]
    fn otsu_separates_two_clusters() {
        let mut samples = vec![20u8; 50];
        samples.extend([22u8; 30]);
        samples.extend([200u8; 40]);
        samples.extend([210u8; 20]);
        let t = otsu_threshold(&samples);
        assert!((22..200).contains(&t), "threshold {t}");
    }

    #[test]
    fn fixed_threshold_marks_dark_pixels() {
        let data = [0u8, 100, 128, 200];
        let view = GrayImageView {
            width: 2,
            height: 2,
            data: &data,
        };
        let bin = CellThreshold::default().apply(&view);
        assert_eq!(bin.count_on(), 3);
    }
}
