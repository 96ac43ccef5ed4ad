//! Global consistency checks on a recognized board.

use log::{info, warn};
use minegrid_core::{ContentHistogram, CLOSED_LABEL, FLAG_LABEL};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rules a content histogram must satisfy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Maximum number of distinct labels.
    pub max_kinds: usize,
    /// Each digit may occur at most once on the board.
    ///
    /// Holds for the calibration boards this reader is tuned on, not for
    /// Minesweeper in general; disable it for arbitrary boards.
    pub require_unique_digits: bool,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            max_kinds: 11,
            require_unique_digits: true,
        }
    }
}

/// First rule a histogram violated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ValidationFailure {
    /// No cells were recognized at all.
    Empty,
    TooManyKinds { kinds: usize, max: usize },
    UnknownSymbol { label: String },
    DuplicateDigit { digit: u8, count: usize },
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationFailure::Empty => f.write_str("no cells recognized"),
            ValidationFailure::TooManyKinds { kinds, max } => {
                write!(f, "{kinds} different cell types detected (max {max})")
            }
            ValidationFailure::UnknownSymbol { label } => {
                write!(f, "invalid cell type detected: {label:?}")
            }
            ValidationFailure::DuplicateDigit { digit, count } => {
                write!(f, "duplicate cell type detected: {digit} occurs {count} times")
            }
        }
    }
}

/// Check `histogram` against `rules`, reporting the first violation.
pub fn validate_histogram(
    histogram: &ContentHistogram,
    rules: &ValidationRules,
) -> Result<(), ValidationFailure> {
    info!("validating grid");
    let outcome = check(histogram, rules);
    if let Err(failure) = &outcome {
        warn!("{failure}");
    }
    outcome
}

/// Convenience wrapper using [`ValidationRules::default`].
pub fn validate(histogram: &ContentHistogram) -> bool {
    validate_histogram(histogram, &ValidationRules::default()).is_ok()
}

fn check(histogram: &ContentHistogram, rules: &ValidationRules) -> Result<(), ValidationFailure> {
    if histogram.is_empty() {
        return Err(ValidationFailure::Empty);
    }
    if histogram.kinds() > rules.max_kinds {
        return Err(ValidationFailure::TooManyKinds {
            kinds: histogram.kinds(),
            max: rules.max_kinds,
        });
    }
    for (label, count) in histogram.iter() {
        if let Some(digit) = digit_value(label) {
            if rules.require_unique_digits && count > 1 {
                return Err(ValidationFailure::DuplicateDigit { digit, count });
            }
        } else if label != FLAG_LABEL && label != CLOSED_LABEL {
            return Err(ValidationFailure::UnknownSymbol {
                label: label.to_string(),
            });
        }
    }
    Ok(())
}

/// Value of a decimal label in `1..=8`; leading zeros are accepted ("05").
fn digit_value(label: &str) -> Option<u8> {
    if label.is_empty() || !label.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits = label.trim_start_matches('0');
    match digits.parse::<u8>() {
        Ok(d @ 1..=8) => Some(d),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minegrid_core::{CellSymbol, Grid, GridAddress};

    fn histogram_of(grid: &Grid) -> ContentHistogram {
        grid.iter_rows().flatten().filter_map(|c| *c).collect()
    }

    #[test]
    fn accepts_board_with_unique_digits() {
        let hist: ContentHistogram = [
            CellSymbol::digit(1).unwrap(),
            CellSymbol::digit(2).unwrap(),
            CellSymbol::Flag,
            CellSymbol::Flag,
            CellSymbol::Closed,
            CellSymbol::Closed,
        ]
        .into_iter()
        .collect();
        assert!(validate(&hist));
    }

    #[test]
    fn rejects_duplicate_digit_on_three_by_three() {
        let mut grid = Grid::new(3, 3);
        for r in 0..3 {
            for c in 0..3 {
                grid.set(GridAddress::new(r, c), CellSymbol::Closed);
            }
        }
        grid.set(GridAddress::new(0, 1), CellSymbol::digit(5).unwrap());
        grid.set(GridAddress::new(2, 2), CellSymbol::digit(5).unwrap());

        let hist = histogram_of(&grid);
        assert!(!validate(&hist));
        assert_eq!(
            validate_histogram(&hist, &ValidationRules::default()),
            Err(ValidationFailure::DuplicateDigit { digit: 5, count: 2 })
        );
    }

    #[test]
    fn duplicate_digits_pass_when_uniqueness_is_off() {
        let hist: ContentHistogram = [CellSymbol::digit(5).unwrap(); 2].into_iter().collect();
        let rules = ValidationRules {
            require_unique_digits: false,
            ..ValidationRules::default()
        };
        assert!(validate_histogram(&hist, &rules).is_ok());
    }

    #[test]
    fn rejects_more_than_eleven_kinds() {
        let mut hist = ContentHistogram::new();
        for i in 0..12 {
            hist.add_label(format!("kind{i}"));
        }
        assert_eq!(
            validate_histogram(&hist, &ValidationRules::default()),
            Err(ValidationFailure::TooManyKinds { kinds: 12, max: 11 })
        );
    }

    #[test]
    fn rejects_unknown_labels() {
        let mut hist = ContentHistogram::new();
        hist.add_label("F");
        hist.add_label("9");
        assert_eq!(
            validate_histogram(&hist, &ValidationRules::default()),
            Err(ValidationFailure::UnknownSymbol { label: "9".into() })
        );
    }

    #[test]
    fn non_canonical_digit_labels_are_digits() {
        let mut hist = ContentHistogram::new();
        hist.add_label("05");
        hist.add_label("F");
        assert!(validate(&hist));

        hist.add_label("05");
        assert_eq!(
            validate_histogram(&hist, &ValidationRules::default()),
            Err(ValidationFailure::DuplicateDigit { digit: 5, count: 2 })
        );

        for label in ["0", "00", "09", "-3", "123456789012345678901"] {
            assert_eq!(digit_value(label), None, "{label}");
        }
    }

    #[test]
    fn rejects_empty_histogram() {
        assert_eq!(
            validate_histogram(&ContentHistogram::new(), &ValidationRules::default()),
            Err(ValidationFailure::Empty)
        );
    }

    #[test]
    fn failure_serializes_with_kind_tag() {
        let json =
            serde_json::to_string(&ValidationFailure::DuplicateDigit { digit: 3, count: 2 })
                .unwrap();
        assert_eq!(json, r#"{"kind":"duplicate_digit","digit":3,"count":2}"#);
    }
}
