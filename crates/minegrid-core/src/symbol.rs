//! Cell symbols and their text labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label used for flagged cells.
pub const FLAG_LABEL: &str = "F";
/// Label used for unrevealed cells.
pub const CLOSED_LABEL: &str = "closed";

/// A revealed neighbour count, always in `1..=8`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Digit(u8);

impl Digit {
    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value <= 8 {
            Some(Self(value))
        } else {
            None
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Parse a label that is exactly one character `'1'..='8'`.
    pub fn from_label(label: &str) -> Option<Self> {
        let mut chars = label.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::new(c.to_digit(10)? as u8)
    }
}

/// Symbolic content of one board cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CellSymbol {
    Digit(Digit),
    Flag,
    Closed,
}

impl CellSymbol {
    pub fn digit(value: u8) -> Option<Self> {
        Digit::new(value).map(Self::Digit)
    }

    /// Text label: `"1"`..`"8"`, `"F"` or `"closed"`.
    pub fn label(&self) -> String {
        match self {
            CellSymbol::Digit(d) => d.get().to_string(),
            CellSymbol::Flag => FLAG_LABEL.to_string(),
            CellSymbol::Closed => CLOSED_LABEL.to_string(),
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            FLAG_LABEL => Some(CellSymbol::Flag),
            CLOSED_LABEL => Some(CellSymbol::Closed),
            other => Digit::from_label(other).map(CellSymbol::Digit),
        }
    }
}

impl fmt::Display for CellSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellSymbol::Digit(d) => write!(f, "{}", d.get()),
            CellSymbol::Flag => f.write_str(FLAG_LABEL),
            CellSymbol::Closed => f.write_str(CLOSED_LABEL),
        }
    }
}

impl From<CellSymbol> for String {
    fn from(value: CellSymbol) -> Self {
        value.label()
    }
}

impl TryFrom<String> for CellSymbol {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CellSymbol::from_label(&value).ok_or_else(|| format!("unknown cell symbol {value:?}"))
    }
}
