use std::io::{Cursor, ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::classify::{GlyphRecognizer, RecognizerError};
use crate::core::BinaryImage;
use ::image::{GrayImage, ImageFormat, Luma};
use log::debug;

/// White margin added around a cell before it is handed to Tesseract.
const BORDER: u32 = 4;

/// Glyph recognizer backed by the `tesseract` command-line tool.
///
/// Each cell is rendered as black ink on white, encoded as PNG and piped to
/// `tesseract stdin stdout --psm 10` (single character mode).
#[derive(Clone, Debug)]
pub struct TesseractRecognizer {
    pub executable: PathBuf,
    /// Tesseract page segmentation mode.
    pub psm: u8,
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TesseractRecognizer {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            psm: 10,
        }
    }

    fn encode_png(cell: &BinaryImage) -> Result<Vec<u8>, RecognizerError> {
        let w = cell.width as u32 + 2 * BORDER;
        let h = cell.height as u32 + 2 * BORDER;
        let img = GrayImage::from_fn(w, h, |x, y| {
            let inside = x >= BORDER && y >= BORDER && x < w - BORDER && y < h - BORDER;
            if inside && cell.is_on((x - BORDER) as usize, (y - BORDER) as usize) {
                Luma([0])
            } else {
                Luma([255])
            }
        });
        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, ImageFormat::Png)
            .map_err(|e| RecognizerError::Failed(format!("png encoding: {e}")))?;
        Ok(png.into_inner())
    }
}

impl GlyphRecognizer for TesseractRecognizer {
    fn recognize_glyph(&self, cell: &BinaryImage) -> Result<String, RecognizerError> {
        let png = Self::encode_png(cell)?;

        let mut child = Command::new(&self.executable)
            .args(["stdin", "stdout", "--psm"])
            .arg(self.psm.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => RecognizerError::Unavailable(format!(
                    "{} not found",
                    self.executable.display()
                )),
                _ => RecognizerError::Io(e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(err) = stdin.write_all(&png) {
                drop(stdin);
                // Reap the child before bailing out.
                let _ = child.kill();
                let _ = child.wait();
                return Err(err.into());
            }
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(RecognizerError::Failed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("tesseract read {text:?}");
        Ok(text)
    }
}
