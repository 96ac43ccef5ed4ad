//! JSON configuration and report helpers for board reading.

use minegrid_core::ContentHistogram;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{BoardReaderParams, BoardReading, ReadStatus};

#[derive(thiserror::Error, Debug)]
pub enum BoardIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Configuration for a batch of board reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardReadConfig {
    #[serde(default)]
    pub image_paths: Vec<String>,
    /// Glyph templates for the template recognizer.
    #[serde(default)]
    pub templates_path: Option<String>,
    /// Tesseract executable; used when no templates are given.
    #[serde(default)]
    pub tesseract: Option<String>,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub diagnostics_dir: Option<String>,
    #[serde(default)]
    pub params: BoardReaderParams,
}

impl BoardReadConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, BoardIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), BoardIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("minegrid_report.json"))
    }
}

/// Outcome for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReport {
    pub image_path: String,
    #[serde(default)]
    pub status: Option<ReadStatus>,
    #[serde(default)]
    pub attempts: usize,
    #[serde(default)]
    pub min_area: Option<f64>,
    #[serde(default)]
    pub rows: usize,
    #[serde(default)]
    pub cols: usize,
    /// Row-major labels, `?` for positions without a region.
    #[serde(default)]
    pub grid: Vec<Vec<String>>,
    #[serde(default)]
    pub histogram: ContentHistogram,
    #[serde(default)]
    pub error: Option<String>,
}

impl ImageReport {
    pub fn new(image_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            status: None,
            attempts: 0,
            min_area: None,
            rows: 0,
            cols: 0,
            grid: Vec::new(),
            histogram: ContentHistogram::new(),
            error: None,
        }
    }

    /// Populate report fields from a finished read.
    pub fn set_reading(&mut self, reading: &BoardReading) {
        self.status = Some(reading.status.clone());
        self.attempts = reading.attempts;
        self.min_area = Some(reading.min_area());
        self.rows = reading.grid.rows();
        self.cols = reading.grid.cols();
        self.grid = reading.grid.to_labels();
        self.histogram = reading.histogram.clone();
        self.error = None;
    }

    /// Record an error that aborted the read.
    pub fn set_error(&mut self, err: impl std::fmt::Display) {
        self.error = Some(err.to_string());
    }

    pub fn is_accepted(&self) -> bool {
        self.status == Some(ReadStatus::Accepted)
    }
}

/// Report for a batch of images.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardReadReport {
    #[serde(default)]
    pub config_path: Option<String>,
    pub images: Vec<ImageReport>,
}

impl BoardReadReport {
    pub fn new(config_path: Option<&Path>) -> Self {
        Self {
            config_path: config_path.map(|p| p.to_string_lossy().into_owned()),
            images: Vec::new(),
        }
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, BoardIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), BoardIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationFailure;

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg: BoardReadConfig =
            serde_json::from_str(r#"{"image_paths": ["a.png"], "params": {"max_attempts": 4}}"#)
                .expect("parse");
        assert_eq!(cfg.image_paths, vec!["a.png".to_string()]);
        assert_eq!(cfg.params.max_attempts, 4);
        assert_eq!(cfg.params.min_area_step, 10.0);
        assert!(cfg.templates_path.is_none());
        assert_eq!(cfg.output_path(), PathBuf::from("minegrid_report.json"));
    }

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let cfg = BoardReadConfig {
            image_paths: vec!["board.png".into()],
            output_path: Some("out.json".into()),
            ..BoardReadConfig::default()
        };
        cfg.write_json(&path).expect("write");
        let loaded = BoardReadConfig::load_json(&path).expect("load");
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.output_path(), PathBuf::from("out.json"));
    }

    #[test]
    fn report_keeps_errors_and_status() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");

        let mut failed = ImageReport::new("missing.png");
        failed.set_error("file not found");
        let mut exhausted = ImageReport::new("noisy.png");
        exhausted.status = Some(ReadStatus::Exhausted {
            last_failure: ValidationFailure::Empty,
        });
        exhausted.attempts = 10;

        let report = BoardReadReport {
            config_path: None,
            images: vec![failed, exhausted],
        };
        report.write_json(&path).expect("write");

        let raw = std::fs::read_to_string(&path).expect("read");
        assert!(raw.contains(r#""status": "exhausted""#));
        let loaded = BoardReadReport::load_json(&path).expect("load");
        assert_eq!(loaded, report);
        assert_eq!(loaded.images[0].error.as_deref(), Some("file not found"));
        assert!(!loaded.images[1].is_accepted());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BoardReadConfig::load_json("/nonexistent/minegrid.json").unwrap_err();
        assert!(matches!(err, BoardIoError::Io(_)));
    }
}
