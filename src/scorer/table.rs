//! Best-so-far tables and the improvement rule shared by workers and the
//! aggregator.

use std::sync::Arc;

use crate::worker::Candidate;

use super::{ScorerKind, ScorerSet};

/// Which scorers of a set accepted a candidate, one bit per set index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Improvement(u32);

impl Improvement {
    #[inline]
    pub fn is_improving(self) -> bool {
        self.0 != 0
    }

    /// Number of scorers the candidate improved.
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn contains(self, index: usize) -> bool {
        self.0 & (1 << index) != 0
    }

    /// Names of the improved scorers, in set order.
    pub fn kinds(self, scorers: &ScorerSet) -> impl Iterator<Item = ScorerKind> + '_ {
        scorers
            .kinds()
            .enumerate()
            .filter(move |(i, _)| self.contains(*i))
            .map(|(_, kind)| kind)
    }

    #[inline]
    fn mark(&mut self, index: usize) {
        self.0 |= 1 << index;
    }
}

/// Best candidate seen so far under each scorer of a set.
///
/// Entries are replaced, never merged: a candidate that is at least as good
/// as the current best takes its place.
#[derive(Debug)]
pub struct ScoreTable {
    scorers: Arc<ScorerSet>,
    bests: Vec<Option<Candidate>>,
}

impl ScoreTable {
    pub fn new(scorers: Arc<ScorerSet>) -> Self {
        let bests = vec![None; scorers.len()];
        Self { scorers, bests }
    }

    /// Applies the improvement rule for `candidate` and records it under
    /// every scorer that accepted it.
    pub fn offer(&mut self, candidate: &Candidate) -> Improvement {
        let mut improvement = Improvement::default();

        for (index, (slot, scorer)) in self
            .bests
            .iter_mut()
            .zip(self.scorers.scorers())
            .enumerate()
        {
            let accepted = match slot {
                None => true,
                Some(best) => scorer.judge(&candidate.address, &best.address).is_better(),
            };
            if accepted {
                *slot = Some(candidate.clone());
                improvement.mark(index);
            }
        }

        improvement
    }

    /// Returns the current best under `kind`, if it is tracked and set.
    pub fn best(&self, kind: ScorerKind) -> Option<&Candidate> {
        let index = self.scorers.index_of(kind)?;
        self.bests[index].as_ref()
    }

    /// Iterates `(scorer, best)` pairs in set order.
    pub fn iter(&self) -> impl Iterator<Item = (ScorerKind, Option<&Candidate>)> {
        self.scorers.kinds().zip(self.bests.iter().map(Option::as_ref))
    }

    pub fn scorers(&self) -> &Arc<ScorerSet> {
        &self.scorers
    }
}
