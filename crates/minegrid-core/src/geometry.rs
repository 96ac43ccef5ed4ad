use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle; `width`/`height` count pixels.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Width over height; `0.0` for degenerate boxes.
    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f32 / self.height as f32
    }

    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + 0.5 * self.width as f32,
            self.y as f32 + 0.5 * self.height as f32,
        )
    }

    /// Intersection with `[0, width) × [0, height)`.
    pub fn clip(&self, width: usize, height: usize) -> Rect {
        let x0 = self.x.min(width);
        let y0 = self.y.min(height);
        let x1 = (self.x + self.width).min(width);
        let y1 = (self.y + self.height).min(height);
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// (row, col) address of a cell in the board grid.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct GridAddress {
    pub row: usize,
    pub col: usize,
}

impl GridAddress {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_to_image_bounds() {
        let r = Rect::new(8, 2, 5, 5);
        assert_eq!(r.clip(10, 4), Rect::new(8, 2, 2, 2));
        assert_eq!(Rect::new(12, 0, 3, 3).clip(10, 10).area(), 0);
    }

    #[test]
    fn aspect_ratio_handles_degenerate_box() {
        assert_eq!(Rect::new(0, 0, 4, 0).aspect_ratio(), 0.0);
        assert_eq!(Rect::new(0, 0, 10, 2).aspect_ratio(), 5.0);
    }
}
