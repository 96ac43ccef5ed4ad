use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::CellSymbol;

/// Occurrence count per symbol label.
///
/// Keyed by label rather than by [`CellSymbol`] so that foreign labels can be
/// represented and rejected by validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHistogram {
    counts: BTreeMap<String, usize>,
}

impl ContentHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, symbol: CellSymbol) {
        self.add_label(symbol.label());
    }

    pub fn add_label(&mut self, label: impl Into<String>) {
        *self.counts.entry(label.into()).or_insert(0) += 1;
    }

    pub fn count(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Number of distinct labels.
    pub fn kinds(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

impl FromIterator<CellSymbol> for ContentHistogram {
    fn from_iter<I: IntoIterator<Item = CellSymbol>>(iter: I) -> Self {
        let mut hist = Self::new();
        for symbol in iter {
            hist.add(symbol);
        }
        hist
    }
}

impl fmt::Display for ContentHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (label, count)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{label}: {count}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_symbols_into_counts() {
        let hist: ContentHistogram = [
            CellSymbol::Flag,
            CellSymbol::digit(2).unwrap(),
            CellSymbol::Flag,
        ]
        .into_iter()
        .collect();
        assert_eq!(hist.count("F"), 2);
        assert_eq!(hist.count("2"), 1);
        assert_eq!(hist.count("closed"), 0);
        assert_eq!(hist.kinds(), 2);
        assert_eq!(hist.total(), 3);
        assert_eq!(hist.to_string(), "{2: 1, F: 2}");
    }
}
