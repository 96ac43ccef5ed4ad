use std::fs;
use std::path::{Path, PathBuf};

use crate::board::{Attempt, BoardReading, PipelineObserver};
use crate::core::{BinaryImage, Rect, RgbImageView};
use crate::segment::Segmentation;
use ::image::{GrayImage, Rgb, RgbImage};
use log::{debug, warn};

const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Observer that writes intermediate images as PNG files:
/// `<stem>_original.png`, `<stem>_binary.png`, one `<stem>_boxes_<n>.png`
/// per attempt and `<stem>_example_<label>.png` for the final reading.
///
/// Write failures are logged and counted; they never affect the read.
pub struct DiagnosticsWriter {
    dir: PathBuf,
    stem: String,
    original: Option<RgbImage>,
    written: Vec<PathBuf>,
    failures: usize,
}

impl DiagnosticsWriter {
    /// Create the output directory if needed.
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            stem: stem.into(),
            original: None,
            written: Vec::new(),
            failures: 0,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    fn save<F>(&mut self, name: &str, save: F)
    where
        F: FnOnce(&Path) -> ::image::ImageResult<()>,
    {
        let path = self.dir.join(format!("{}_{name}.png", self.stem));
        match save(&path) {
            Ok(()) => {
                debug!("wrote {}", path.display());
                self.written.push(path);
            }
            Err(err) => {
                warn!("failed to write {}: {err}", path.display());
                self.failures += 1;
            }
        }
    }
}

fn to_rgb_image(view: &RgbImageView<'_>) -> Option<RgbImage> {
    RgbImage::from_raw(view.width as u32, view.height as u32, view.data.to_vec())
}

fn to_gray_image(binary: &BinaryImage) -> Option<GrayImage> {
    GrayImage::from_raw(binary.width as u32, binary.height as u32, binary.data.clone())
}

fn draw_rect(img: &mut RgbImage, rect: Rect) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    let (w, h) = (img.width() as usize, img.height() as usize);
    if rect.x >= w || rect.y >= h {
        return;
    }
    let x1 = (rect.x + rect.width - 1).min(w - 1);
    let y1 = (rect.y + rect.height - 1).min(h - 1);
    for x in rect.x..=x1 {
        img.put_pixel(x as u32, rect.y as u32, BOX_COLOR);
        img.put_pixel(x as u32, y1 as u32, BOX_COLOR);
    }
    for y in rect.y..=y1 {
        img.put_pixel(rect.x as u32, y as u32, BOX_COLOR);
        img.put_pixel(x1 as u32, y as u32, BOX_COLOR);
    }
}

impl PipelineObserver for DiagnosticsWriter {
    fn on_preprocessed(&mut self, image: &RgbImageView<'_>, binary: &BinaryImage) {
        self.original = to_rgb_image(image);
        if let Some(original) = self.original.clone() {
            self.save("original", |p| original.save(p));
        }
        if let Some(gray) = to_gray_image(binary) {
            self.save("binary", |p| gray.save(p));
        }
    }

    fn on_segmented(&mut self, attempt: Attempt, segmentation: &Segmentation) {
        let Some(mut overlay) = self.original.clone() else {
            return;
        };
        for region in &segmentation.regions {
            draw_rect(&mut overlay, region.rect);
        }
        self.save(&format!("boxes_{}", attempt.number), |p| overlay.save(p));
    }

    fn on_finished(&mut self, reading: &BoardReading) {
        for (label, cell) in &reading.examples {
            if let Some(gray) = to_gray_image(cell) {
                self.save(&format!("example_{label}"), |p| gray.save(p));
            }
        }
    }
}
