use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CellSymbol, GridAddress};

/// Text printed for grid positions that no cell region mapped to.
pub const MISSING_LABEL: &str = "?";

/// Row-major board of recognized cells. Positions never written stay `None`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<CellSymbol>>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, addr: GridAddress) -> bool {
        addr.row < self.rows && addr.col < self.cols
    }

    pub fn get(&self, addr: GridAddress) -> Option<CellSymbol> {
        if !self.contains(addr) {
            return None;
        }
        self.cells[addr.row * self.cols + addr.col]
    }

    /// Store `symbol` at `addr`; returns `false` if the address is outside the grid.
    pub fn set(&mut self, addr: GridAddress, symbol: CellSymbol) -> bool {
        if !self.contains(addr) {
            return false;
        }
        self.cells[addr.row * self.cols + addr.col] = Some(symbol);
        true
    }

    pub fn row(&self, row: usize) -> &[Option<CellSymbol>] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Option<CellSymbol>]> {
        (0..self.rows).map(move |r| self.row(r))
    }

    /// Label matrix, using [`MISSING_LABEL`] for empty positions.
    pub fn to_labels(&self) -> Vec<Vec<String>> {
        self.iter_rows()
            .map(|row| {
                row.iter()
                    .map(|c| c.map_or_else(|| MISSING_LABEL.to_string(), |s| s.label()))
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.to_labels().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(&row.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_outside_grid_is_rejected() {
        let mut grid = Grid::new(2, 3);
        assert!(grid.set(GridAddress::new(1, 2), CellSymbol::Flag));
        assert!(!grid.set(GridAddress::new(2, 0), CellSymbol::Flag));
        assert_eq!(grid.get(GridAddress::new(1, 2)), Some(CellSymbol::Flag));
        assert_eq!(grid.get(GridAddress::new(0, 0)), None);
    }

    #[test]
    fn prints_rows_of_space_separated_symbols() {
        let mut grid = Grid::new(2, 2);
        grid.set(GridAddress::new(0, 0), CellSymbol::digit(1).unwrap());
        grid.set(GridAddress::new(0, 1), CellSymbol::Flag);
        grid.set(GridAddress::new(1, 0), CellSymbol::Closed);
        assert_eq!(grid.to_string(), "1 F\nclosed ?");
    }

    #[test]
    fn empty_grid_prints_nothing() {
        let grid = Grid::new(0, 0);
        assert!(grid.is_empty());
        assert_eq!(grid.to_string(), "");
    }
}
