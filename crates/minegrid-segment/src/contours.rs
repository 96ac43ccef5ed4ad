//! External contour extraction on binary images.
//!
//! Foreground is 8-connected, background 4-connected. A component is
//! *external* when it touches the image frame or the background region that
//! is connected to the frame; components sitting inside a hole of another
//! component are skipped.

use std::collections::VecDeque;

use minegrid_core::{BinaryImage, Rect};
use serde::{Deserialize, Serialize};

/// Clockwise neighbour ring (y axis pointing down), starting west.
const DIRS: [(i64, i64); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

const DIRS4: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Closed outer boundary of one foreground component, as pixel coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<(i64, i64)>,
}

impl Contour {
    /// Enclosed polygon area (shoelace formula over boundary pixel centers).
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice = 0i64;
        for i in 0..n {
            let (x0, y0) = self.points[i];
            let (x1, y1) = self.points[(i + 1) % n];
            twice += x0 * y1 - x1 * y0;
        }
        twice.abs() as f64 * 0.5
    }

    /// Inclusive pixel bounding box.
    pub fn bounding_rect(&self) -> Rect {
        let mut min_x = i64::MAX;
        let mut min_y = i64::MAX;
        let mut max_x = i64::MIN;
        let mut max_y = i64::MIN;
        for &(x, y) in &self.points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        if self.points.is_empty() {
            return Rect::default();
        }
        Rect::new(
            min_x as usize,
            min_y as usize,
            (max_x - min_x + 1) as usize,
            (max_y - min_y + 1) as usize,
        )
    }
}

/// Source of external contours for a binary image.
pub trait ContourExtractor {
    fn external_contours(&self, image: &BinaryImage) -> Vec<Contour>;
}

/// Connected-component labelling followed by Moore-neighbour boundary tracing.
#[derive(Clone, Copy, Debug, Default)]
pub struct BorderFollower;

impl ContourExtractor for BorderFollower {
    fn external_contours(&self, image: &BinaryImage) -> Vec<Contour> {
        if image.width == 0 || image.height == 0 {
            return Vec::new();
        }
        let (labels, starts) = label_components(image);
        let external = external_components(image, &labels, starts.len());

        starts
            .iter()
            .zip(&external)
            .filter(|(_, &is_external)| is_external)
            .map(|(&start, _)| trace_boundary(image, start))
            .collect()
    }
}

/// Label 8-connected foreground components.
///
/// Returns per-pixel labels (`0` = background, `k + 1` = component `k`) and
/// the first pixel of each component in row-major order.
fn label_components(image: &BinaryImage) -> (Vec<u32>, Vec<(usize, usize)>) {
    let (w, h) = (image.width, image.height);
    let mut labels = vec![0u32; w * h];
    let mut starts = Vec::new();
    let mut queue = VecDeque::new();

    for y in 0..h {
        for x in 0..w {
            if !image.is_on(x, y) || labels[y * w + x] != 0 {
                continue;
            }
            starts.push((x, y));
            let label = starts.len() as u32;
            labels[y * w + x] = label;
            queue.push_back((x, y));

            while let Some((cx, cy)) = queue.pop_front() {
                for (dx, dy) in DIRS {
                    let nx = cx as i64 + dx;
                    let ny = cy as i64 + dy;
                    if !image.is_on_signed(nx, ny) {
                        continue;
                    }
                    let idx = ny as usize * w + nx as usize;
                    if labels[idx] == 0 {
                        labels[idx] = label;
                        queue.push_back((nx as usize, ny as usize));
                    }
                }
            }
        }
    }

    (labels, starts)
}

/// Flag components reachable from the frame through 4-connected background.
fn external_components(image: &BinaryImage, labels: &[u32], count: usize) -> Vec<bool> {
    let (w, h) = (image.width, image.height);
    let mut external = vec![false; count];
    let mut outer = vec![false; w * h];
    let mut queue = VecDeque::new();

    let mut seed = |x: usize, y: usize, queue: &mut VecDeque<(usize, usize)>| {
        let idx = y * w + x;
        if image.is_on(x, y) {
            external[labels[idx] as usize - 1] = true;
        } else if !outer[idx] {
            outer[idx] = true;
            queue.push_back((x, y));
        }
    };
    for x in 0..w {
        seed(x, 0, &mut queue);
        seed(x, h - 1, &mut queue);
    }
    for y in 0..h {
        seed(0, y, &mut queue);
        seed(w - 1, y, &mut queue);
    }

    while let Some((cx, cy)) = queue.pop_front() {
        for (dx, dy) in DIRS4 {
            let nx = cx as i64 + dx;
            let ny = cy as i64 + dy;
            if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                continue;
            }
            let idx = ny as usize * w + nx as usize;
            if image.is_on(nx as usize, ny as usize) {
                external[labels[idx] as usize - 1] = true;
            } else if !outer[idx] {
                outer[idx] = true;
                queue.push_back((nx as usize, ny as usize));
            }
        }
    }

    external
}

fn dir_index(dx: i64, dy: i64) -> usize {
    DIRS.iter().position(|&d| d == (dx, dy)).unwrap_or(0)
}

/// One Moore step: the first foreground neighbour clockwise after `back`,
/// plus the backtrack direction as seen from that neighbour.
fn moore_step(image: &BinaryImage, cur: (i64, i64), back: usize) -> Option<((i64, i64), usize)> {
    for k in 1..8 {
        let d = (back + k) % 8;
        let q = (cur.0 + DIRS[d].0, cur.1 + DIRS[d].1);
        if image.is_on_signed(q.0, q.1) {
            let p = DIRS[(d + 7) % 8];
            let prev = (cur.0 + p.0, cur.1 + p.1);
            return Some((q, dir_index(prev.0 - q.0, prev.1 - q.1)));
        }
    }
    None
}

/// Trace the outer boundary of the component whose first row-major pixel is
/// `start` (its west neighbour is background by construction).
fn trace_boundary(image: &BinaryImage, start: (usize, usize)) -> Contour {
    let start = (start.0 as i64, start.1 as i64);
    let mut points = vec![start];
    let mut cur = start;
    let mut back = 0usize;
    let mut second = None;
    let max_steps = 4 * image.width * image.height + 8;

    for _ in 0..max_steps {
        let Some((next, next_back)) = moore_step(image, cur, back) else {
            break;
        };
        match second {
            None => second = Some(next),
            Some(sec) if cur == start && next == sec => break,
            Some(_) => {}
        }
        points.push(next);
        cur = next;
        back = next_back;
    }

    if points.len() > 1 && points.last() == Some(&start) {
        points.pop();
    }
    Contour { points }
}
