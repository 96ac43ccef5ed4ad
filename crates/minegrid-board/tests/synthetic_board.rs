use minegrid_board::{
    Attempt, BoardReader, BoardReaderParams, BoardReading, ImageReport, PipelineObserver,
    ReadState, ReadStatus, ValidationFailure,
};
use minegrid_classify::{GlyphRecognizer, RecognizerError};
use minegrid_core::{BinaryImage, CellSymbol, GridAddress, RgbImageView};
use minegrid_segment::Segmentation;

const CELL: usize = 24;
const GAP: usize = 6;
const ORIGIN: usize = 10;
const DARK: u8 = 30;

/// Reads the digit `n` from a cell holding `n` 2x2 holes.
struct HoleCounter;

impl GlyphRecognizer for HoleCounter {
    fn recognize_glyph(&self, cell: &BinaryImage) -> Result<String, RecognizerError> {
        let off = cell.width * cell.height - cell.count_on();
        let n = off / 4;
        Ok(if (1..=8).contains(&n) {
            n.to_string()
        } else {
            String::new()
        })
    }
}

struct Canvas {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Canvas {
    fn white(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![255; width * height * 3],
        }
    }

    fn fill(&mut self, x0: usize, y0: usize, w: usize, h: usize, value: u8) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                let i = (y * self.width + x) * 3;
                self.data[i..i + 3].fill(value);
            }
        }
    }

    /// Dark square with `holes` white 2x2 dots on a 3-column lattice.
    fn blob(&mut self, x0: usize, y0: usize, size: usize, holes: usize) {
        self.fill(x0, y0, size, size, DARK);
        for k in 0..holes {
            self.fill(x0 + 4 + 6 * (k % 3), y0 + 4 + 6 * (k / 3), 2, 2, 255);
        }
    }

    fn view(&self) -> RgbImageView<'_> {
        RgbImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

/// 3x3 board: `1 2 3 / F 4 F / 5 6 F`; flags are cells without holes.
fn board(height: usize) -> Canvas {
    let side = ORIGIN * 2 + CELL * 3 + GAP * 2;
    let mut canvas = Canvas::white(side, height.max(side));
    let holes = [[1, 2, 3], [0, 4, 0], [5, 6, 0]];
    for (r, row) in holes.iter().enumerate() {
        for (c, &n) in row.iter().enumerate() {
            canvas.blob(
                ORIGIN + c * (CELL + GAP),
                ORIGIN + r * (CELL + GAP),
                CELL,
                n,
            );
        }
    }
    canvas
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Default)]
struct Trace {
    attempts: Vec<Attempt>,
    grid_sizes: Vec<(usize, usize)>,
    failures: Vec<ValidationFailure>,
    last_state: Option<ReadState>,
}

impl PipelineObserver for Trace {
    fn on_state(&mut self, _attempt: Attempt, state: ReadState) {
        self.last_state = Some(state);
    }

    fn on_segmented(&mut self, attempt: Attempt, segmentation: &Segmentation) {
        self.attempts.push(attempt);
        self.grid_sizes.push((segmentation.rows, segmentation.cols));
    }

    fn on_validated(&mut self, _attempt: Attempt, outcome: &Result<(), ValidationFailure>) {
        if let Err(f) = outcome {
            self.failures.push(f.clone());
        }
    }

    fn on_finished(&mut self, reading: &BoardReading) {
        assert!(reading.attempts >= 1);
    }
}

#[test]
fn reads_clean_board_on_first_attempt() {
    init_logs();
    let canvas = board(0);
    let reader = BoardReader::new(BoardReaderParams::default(), HoleCounter);
    let reading = reader.read(&canvas.view()).expect("read");

    assert_eq!(reading.status, ReadStatus::Accepted);
    assert_eq!(reading.attempts, 1);
    assert_eq!(reading.grid.to_string(), "1 2 3\nF 4 F\n5 6 F");
    assert_eq!(reading.histogram.count("F"), 3);
    assert_eq!(reading.histogram.total(), 9);
    assert_eq!(
        reading.grid.get(GridAddress::new(1, 1)),
        CellSymbol::digit(4)
    );
    assert_eq!(reading.segmentation.regions.len(), 9);
    assert!(reading.examples.contains_key("F"));
    assert!(reading.examples.contains_key("6"));
}

#[test]
fn noise_is_dropped_by_raising_min_area() {
    init_logs();
    let mut canvas = board(140);
    // Small blobs that read as a duplicated "1".
    canvas.blob(10, 115, 10, 1);
    canvas.blob(50, 115, 10, 1);

    let params = BoardReaderParams::default();
    let reader = BoardReader::new(params.clone(), HoleCounter);
    let mut trace = Trace::default();
    let reading = reader
        .read_observed(&canvas.view(), &mut trace)
        .expect("read");

    assert!(reading.is_accepted());
    assert!(reading.attempts > 1 && reading.attempts <= 5);
    assert_eq!(reading.grid.to_string(), "1 2 3\nF 4 F\n5 6 F");
    assert_eq!(
        reading.min_area(),
        params.min_area_for_attempt(reading.attempts)
    );

    assert_eq!(trace.attempts.len(), reading.attempts);
    assert_eq!(trace.grid_sizes[0], (4, 3));
    assert_eq!(trace.grid_sizes.last(), Some(&(3, 3)));
    assert!(matches!(
        trace.failures[0],
        ValidationFailure::DuplicateDigit { digit: 1, count: 3 }
    ));
    assert_eq!(trace.last_state, Some(ReadState::Accepted));
}

#[test]
fn blank_screenshot_runs_every_attempt() {
    let canvas = Canvas::white(60, 40);
    let reader = BoardReader::new(BoardReaderParams::default(), HoleCounter);
    let mut trace = Trace::default();
    let reading = reader
        .read_observed(&canvas.view(), &mut trace)
        .expect("read");

    assert_eq!(trace.attempts.len(), 10);
    let areas: Vec<f64> = trace.attempts.iter().map(|a| a.min_area).collect();
    assert_eq!(areas.first(), Some(&50.0));
    assert_eq!(areas.last(), Some(&140.0));
    assert!(trace.failures.iter().all(|f| *f == ValidationFailure::Empty));
    assert_eq!(trace.last_state, Some(ReadState::Exhausted));
    assert!(!reading.is_accepted());
    assert_eq!(reading.grid.to_string(), "");
}

#[test]
fn images_are_read_independently() {
    let clean = board(0);
    let blank = Canvas::white(30, 30);
    let reader = BoardReader::new(BoardReaderParams::default(), HoleCounter);

    let results = reader.read_all([clean.view(), blank.view(), clean.view()]);
    let reports: Vec<ImageReport> = results
        .iter()
        .enumerate()
        .map(|(i, res)| {
            let mut report = ImageReport::new(format!("img{i}.png"));
            match res {
                Ok(reading) => report.set_reading(reading),
                Err(err) => report.set_error(err),
            }
            report
        })
        .collect();

    assert!(reports[0].is_accepted());
    assert!(!reports[1].is_accepted());
    assert_eq!(reports[0].grid, reports[2].grid);
    assert_eq!(reports[0].grid[1], vec!["F", "4", "F"]);
    assert_eq!((reports[0].rows, reports[0].cols), (3, 3));
}

#[test]
fn duplicates_are_allowed_when_uniqueness_is_off() {
    let mut canvas = board(140);
    canvas.blob(10, 115, 10, 1);
    canvas.blob(50, 115, 10, 1);

    let mut params = BoardReaderParams::default();
    params.validation.require_unique_digits = false;
    let reader = BoardReader::new(params, HoleCounter);
    let reading = reader.read(&canvas.view()).expect("read");

    assert_eq!(reading.attempts, 1);
    assert_eq!(reading.histogram.count("1"), 3);
    assert_eq!((reading.grid.rows(), reading.grid.cols()), (4, 3));
}
