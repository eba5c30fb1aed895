//! Global merge point for forwarded candidates.

use std::sync::Arc;

use log::debug;

use crate::report::{ReportError, Reporter};
use crate::scorer::{Improvement, ScoreTable, ScorerSet};

use super::Candidate;

/// Owns the global best-so-far table and reports every candidate that
/// improves it.
///
/// Meant to be driven by a single consumer of the workers' merged stream,
/// so the table needs no locking.
pub struct Aggregator<R> {
    table: ScoreTable,
    reporter: R,
    reported: u64,
}

impl<R: Reporter> Aggregator<R> {
    pub fn new(scorers: Arc<ScorerSet>, reporter: R) -> Self {
        Self {
            table: ScoreTable::new(scorers),
            reporter,
            reported: 0,
        }
    }

    /// Applies the improvement rule against the global table and reports
    /// the candidate if it improved any scorer.
    ///
    /// The table is updated even when reporting fails.
    pub fn offer(&mut self, candidate: Candidate) -> Result<Improvement, ReportError> {
        let improvement = self.table.offer(&candidate);
        if improvement.is_improving() {
            if log::log_enabled!(log::Level::Debug) {
                let scorers = self.table.scorers();
                for kind in improvement.kinds(scorers) {
                    debug!(
                        "new best {}: {} ({})",
                        kind,
                        candidate.address,
                        kind.describe(&candidate.address)
                    );
                }
            }
            self.reporter.report(&candidate)?;
            self.reported += 1;
        }
        Ok(improvement)
    }

    /// The global best-so-far table.
    pub fn table(&self) -> &ScoreTable {
        &self.table
    }

    /// Number of candidates successfully reported.
    pub fn reported(&self) -> u64 {
        self.reported
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::crypto::{Address, Keypair};
    use crate::scorer::ScorerKind;

    #[derive(Default)]
    struct Collect(Vec<Candidate>);

    impl Reporter for Collect {
        fn report(&mut self, candidate: &Candidate) -> Result<(), ReportError> {
            self.0.push(candidate.clone());
            Ok(())
        }
    }

    struct Broken;

    impl Reporter for Broken {
        fn report(&mut self, _candidate: &Candidate) -> Result<(), ReportError> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed").into())
        }
    }

    fn candidate(hex_str: &str, nonce: u64) -> Candidate {
        let mut secret = [0u8; 32];
        secret[31] = 3;
        let key = Arc::new(Keypair::from_secret_key(secret).unwrap());
        Candidate::new(hex_str.parse::<Address>().unwrap(), key, nonce, 0)
    }

    #[test]
    fn test_reports_only_global_improvements() {
        let scorers = Arc::new(ScorerSet::new([ScorerKind::Least]));
        let mut aggregator = Aggregator::new(scorers, Collect::default());

        let a = candidate("0000000000000000000000000000000000000005", 0);
        let b = candidate("0000000000000000000000000000000000000009", 1);
        let c = candidate("0000000000000000000000000000000000000001", 2);

        assert!(aggregator.offer(a.clone()).unwrap().is_improving());
        assert!(!aggregator.offer(b).unwrap().is_improving());
        assert!(aggregator.offer(c.clone()).unwrap().is_improving());

        assert_eq!(aggregator.reported(), 2);
        assert_eq!(aggregator.into_reporter().0, vec![a, c]);
    }

    #[test]
    fn test_independent_aggregators_do_not_share_state() {
        let scorers = Arc::new(ScorerSet::default());
        let mut first = Aggregator::new(scorers.clone(), Collect::default());
        let mut second = Aggregator::new(scorers, Collect::default());

        let good = candidate("4141414141414141414141414141414141414141", 0);
        let poor = candidate("ffffffffffffffffffffffffffffffffffffffff", 0);
        first.offer(good).unwrap();

        assert!(second.offer(poor).unwrap().is_improving());
        assert!(second.table().best(ScorerKind::Ascii).is_some());
    }

    #[test]
    fn test_report_error_surfaces_but_table_updates() {
        let scorers = Arc::new(ScorerSet::new([ScorerKind::Least]));
        let mut aggregator = Aggregator::new(scorers, Broken);
        let a = candidate("0000000000000000000000000000000000000005", 0);

        assert!(aggregator.offer(a.clone()).is_err());
        assert_eq!(aggregator.reported(), 0);
        assert_eq!(aggregator.table().best(ScorerKind::Least), Some(&a));
    }
}
