//! Address scoring.
//!
//! Supports multiple independent ranking criteria:
//! - Least: lowest address value
//! - Ascii: most bytes in printable ASCII
//! - Ascending / StrictAscending: longest ascending nibble prefix
//!
//! Each active scorer keeps its own best-so-far entry in a [`ScoreTable`].

mod policy;
mod table;

use std::fmt;

pub use policy::{
    ascending_run, ascii_density, Ascending, AsciiDensity, Least, Scorer, ScorerKind, Verdict,
};
pub use table::{Improvement, ScoreTable};

/// The active scorers, in configured order, without duplicates.
pub struct ScorerSet {
    entries: Vec<(ScorerKind, Box<dyn Scorer>)>,
}

impl ScorerSet {
    pub fn new(kinds: impl IntoIterator<Item = ScorerKind>) -> Self {
        let mut entries: Vec<(ScorerKind, Box<dyn Scorer>)> = Vec::new();
        for kind in kinds {
            if !entries.iter().any(|(k, _)| *k == kind) {
                entries.push((kind, kind.scorer()));
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = ScorerKind> + '_ {
        self.entries.iter().map(|(kind, _)| *kind)
    }

    pub fn scorers(&self) -> impl Iterator<Item = &(dyn Scorer + 'static)> {
        self.entries.iter().map(|(_, scorer)| scorer.as_ref())
    }

    pub fn index_of(&self, kind: ScorerKind) -> Option<usize> {
        self.entries.iter().position(|(k, _)| *k == kind)
    }
}

impl Default for ScorerSet {
    fn default() -> Self {
        Self::new([ScorerKind::Ascii])
    }
}

impl fmt::Debug for ScorerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}

impl fmt::Display for ScorerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.kinds().map(|k| k.to_string()).collect();
        write!(f, "{}", names.join(","))
    }
}
