//! Template-based glyph recognition.
//!
//! A cell is reduced to a [`GlyphCode`]: a square box with the side of the
//! longer foreground extent, centred on the foreground, is split into an 8×8
//! grid and each block becomes one bit (set when at least half of its pixels
//! are foreground). The square box keeps the glyph's aspect ratio, so a thin
//! bar and a solid block encode differently. Codes are matched against
//! labelled templates by Hamming distance.

use std::fs;
use std::path::Path;

use minegrid_core::BinaryImage;
use serde::{Deserialize, Serialize};

use crate::{GlyphRecognizer, RecognizerError};

/// Side length of the glyph bit grid.
pub const GLYPH_BITS: usize = 8;

/// 8×8 glyph bits, row-major, foreground = 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlyphCode(pub u64);

impl GlyphCode {
    /// Encode the foreground of `cell`; `None` if the cell is empty.
    pub fn from_binary(cell: &BinaryImage) -> Option<Self> {
        let bounds = cell.foreground_bounds()?;
        let side = bounds.width.max(bounds.height);
        // Pixels of the square box outside the image count as background.
        let left = bounds.x as i64 - (side - bounds.width) as i64 / 2;
        let top = bounds.y as i64 - (side - bounds.height) as i64 / 2;

        let mut code = 0u64;
        for by in 0..GLYPH_BITS {
            let (y0, y1) = block_span(top, side, by);
            for bx in 0..GLYPH_BITS {
                let (x0, x1) = block_span(left, side, bx);
                let mut on = 0usize;
                for y in y0..y1 {
                    for x in x0..x1 {
                        on += cell.is_on_signed(x, y) as usize;
                    }
                }
                let total = ((x1 - x0) * (y1 - y0)) as usize;
                if 2 * on >= total {
                    code |= 1 << (by * GLYPH_BITS + bx);
                }
            }
        }
        Some(Self(code))
    }

    #[inline]
    pub fn hamming(self, other: GlyphCode) -> u32 {
        (self.0 ^ other.0).count_ones()
    }
}

/// Pixel span of block `i` when `len` pixels starting at `start` are split
/// into `GLYPH_BITS` blocks; never empty.
fn block_span(start: i64, len: usize, i: usize) -> (i64, i64) {
    let a = start + (i * len / GLYPH_BITS) as i64;
    let b = start + ((i + 1) * len / GLYPH_BITS) as i64;
    (a, b.max(a + 1))
}

/// One labelled reference glyph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphTemplate {
    pub label: String,
    pub code: GlyphCode,
}

/// Best template for an observed code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplateMatch<'a> {
    pub label: &'a str,
    pub hamming: u32,
}

#[derive(thiserror::Error, Debug)]
pub enum TemplateIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Glyph recognizer calibrated from labelled cell crops.
///
/// Uses a brute-force search over all templates; boards need a handful of
/// templates at most.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRecognizer {
    /// Maximum Hamming distance for a match.
    pub max_hamming: u32,
    pub templates: Vec<GlyphTemplate>,
}

impl Default for TemplateRecognizer {
    fn default() -> Self {
        Self::new(6)
    }
}

impl TemplateRecognizer {
    pub fn new(max_hamming: u32) -> Self {
        Self {
            max_hamming,
            templates: Vec::new(),
        }
    }

    /// Add a template from a labelled cell; returns `false` for empty cells.
    pub fn learn(&mut self, label: impl Into<String>, cell: &BinaryImage) -> bool {
        let Some(code) = GlyphCode::from_binary(cell) else {
            return false;
        };
        self.templates.push(GlyphTemplate {
            label: label.into(),
            code,
        });
        true
    }

    /// Closest template within `max_hamming`; ties keep the earliest template.
    pub fn match_code(&self, observed: GlyphCode) -> Option<TemplateMatch<'_>> {
        let mut best: Option<TemplateMatch<'_>> = None;
        for t in &self.templates {
            let h = observed.hamming(t.code);
            if h > self.max_hamming {
                continue;
            }
            if best.map_or(true, |b| h < b.hamming) {
                best = Some(TemplateMatch {
                    label: &t.label,
                    hamming: h,
                });
                if h == 0 {
                    break;
                }
            }
        }
        best
    }

    /// Load templates from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, TemplateIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write templates to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), TemplateIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl GlyphRecognizer for TemplateRecognizer {
    fn recognize_glyph(&self, cell: &BinaryImage) -> Result<String, RecognizerError> {
        let text = GlyphCode::from_binary(cell)
            .and_then(|code| self.match_code(code))
            .map(|m| m.label.to_string())
            .unwrap_or_default();
        Ok(text)
    }
}
