//! Per-thread worker: scores its own candidate stream against a private
//! table and forwards only local improvements.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use log::{debug, error};

use crate::crypto::KeygenError;
use crate::scorer::ScoreTable;

use super::source::{CandidateSource, KeyGenerator};
use super::Candidate;

/// What a worker hands to the aggregator.
pub type Forwarded = Result<Candidate, KeygenError>;

/// Counters shared by all workers.
#[derive(Debug, Default)]
pub struct SearchStats {
    /// Keypairs drawn from the generators
    pub keypairs_generated: AtomicU64,
    /// Candidates scored against local tables
    pub candidates_scored: AtomicU64,
    /// Candidates forwarded to the aggregator
    pub candidates_forwarded: AtomicU64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_keypairs(&self) -> u64 {
        self.keypairs_generated.load(Ordering::Relaxed)
    }

    pub fn total_scored(&self) -> u64 {
        self.candidates_scored.load(Ordering::Relaxed)
    }

    pub fn total_forwarded(&self) -> u64 {
        self.candidates_forwarded.load(Ordering::Relaxed)
    }
}

/// A worker pairing one candidate source with one local score table.
pub struct Worker<K> {
    /// Worker ID
    id: usize,
    source: CandidateSource<K>,
    table: ScoreTable,
    /// Handoff to the aggregator
    forward_tx: Sender<Forwarded>,
    stop_flag: Arc<AtomicBool>,
    stats: Arc<SearchStats>,
}

impl<K: KeyGenerator> Worker<K> {
    pub fn new(
        id: usize,
        source: CandidateSource<K>,
        table: ScoreTable,
        forward_tx: Sender<Forwarded>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<SearchStats>,
    ) -> Self {
        Self {
            id,
            source,
            table,
            forward_tx,
            stop_flag,
            stats,
        }
    }

    /// Runs the worker loop.
    ///
    /// Scores candidates until:
    /// - Stop flag is set
    /// - The aggregator hangs up
    /// - Key generation fails (the error is forwarded first)
    pub fn run(mut self) {
        // Stats are flushed per batch to keep atomics off the hot path
        const BATCH_SIZE: u64 = 256;

        debug!("worker {} started", self.id);

        while !self.stop_flag.load(Ordering::Relaxed) {
            let keypairs_before = self.source.keypairs_generated();
            let batch = self.run_batch(BATCH_SIZE);

            self.stats
                .candidates_scored
                .fetch_add(batch.scored, Ordering::Relaxed);
            self.stats
                .candidates_forwarded
                .fetch_add(batch.forwarded, Ordering::Relaxed);
            self.stats.keypairs_generated.fetch_add(
                self.source.keypairs_generated() - keypairs_before,
                Ordering::Relaxed,
            );

            if batch.finished {
                return;
            }
        }

        debug!("worker {} stopped", self.id);
    }

    fn run_batch(&mut self, size: u64) -> Batch {
        let mut batch = Batch::default();

        for _ in 0..size {
            let Some(next) = self.source.next() else {
                batch.finished = true;
                break;
            };
            let candidate = match next {
                Ok(candidate) => candidate,
                Err(e) => {
                    error!("worker {}: keypair generation failed: {}", self.id, e);
                    let _ = self.forward_tx.send(Err(e));
                    batch.finished = true;
                    break;
                }
            };

            batch.scored += 1;
            if self.table.offer(&candidate).is_improving() {
                if self.forward_tx.send(Ok(candidate)).is_err() {
                    debug!("worker {} stopped: aggregator gone", self.id);
                    batch.finished = true;
                    break;
                }
                batch.forwarded += 1;
            }
        }

        batch
    }
}

/// Counters for one batch, plus whether the worker must exit.
#[derive(Debug, Default)]
struct Batch {
    scored: u64,
    forwarded: u64,
    finished: bool,
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::unbounded;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::scorer::{ScorerKind, ScorerSet};
    use crate::crypto::Keypair;
    use crate::worker::{DerivationMode, KeyGenerator, RngKeyGenerator};

    /// Hands out `remaining` good keypairs, then reports a dead RNG.
    struct FailAfter {
        keys: RngKeyGenerator<StdRng>,
        remaining: usize,
    }

    impl FailAfter {
        fn new(remaining: usize) -> Self {
            Self {
                keys: RngKeyGenerator::new(StdRng::seed_from_u64(3)),
                remaining,
            }
        }
    }

    impl KeyGenerator for FailAfter {
        fn next_keypair(&mut self) -> Result<Keypair, KeygenError> {
            if self.remaining == 0 {
                return Err(rand::Error::new("entropy source closed").into());
            }
            self.remaining -= 1;
            self.keys.next_keypair()
        }
    }

    fn make_worker(
        stop_flag: Arc<AtomicBool>,
    ) -> (Worker<RngKeyGenerator<StdRng>>, crossbeam_channel::Receiver<Forwarded>) {
        let scorers = Arc::new(ScorerSet::new([ScorerKind::Least, ScorerKind::Ascii]));
        let (tx, rx) = unbounded();
        let source = CandidateSource::new(
            RngKeyGenerator::new(StdRng::seed_from_u64(11)),
            DerivationMode::Contract { max_nonce: 8 },
        );
        let worker = Worker::new(
            0,
            source,
            ScoreTable::new(scorers),
            tx,
            stop_flag,
            Arc::new(SearchStats::new()),
        );
        (worker, rx)
    }

    #[test]
    fn test_worker_stops_when_aggregator_hangs_up() {
        let (worker, rx) = make_worker(Arc::new(AtomicBool::new(false)));
        let stats = worker.stats.clone();
        drop(rx);
        // Returns on the first forward attempt.
        worker.run();

        assert_eq!(stats.total_scored(), 1);
        assert_eq!(stats.total_forwarded(), 0);
        assert_eq!(stats.total_keypairs(), 1);
    }

    #[test]
    fn test_keygen_failure_is_forwarded_and_counted() {
        let scorers = Arc::new(ScorerSet::new([ScorerKind::Ascii]));
        let (tx, rx) = unbounded();
        let stats = Arc::new(SearchStats::new());
        let source = CandidateSource::new(
            FailAfter::new(3),
            DerivationMode::Contract { max_nonce: 2 },
        );
        let worker = Worker::new(
            0,
            source,
            ScoreTable::new(scorers),
            tx,
            Arc::new(AtomicBool::new(false)),
            stats.clone(),
        );
        worker.run();

        let items: Vec<Forwarded> = rx.try_iter().collect();
        assert!(matches!(items.last(), Some(Err(KeygenError::Entropy(_)))));
        assert!(items[..items.len() - 1].iter().all(Result::is_ok));
        assert_eq!(stats.total_keypairs(), 3);
        assert_eq!(stats.total_scored(), 6);
        assert_eq!(stats.total_forwarded(), items.len() as u64 - 1);
    }

    #[test]
    fn test_worker_honors_stop_flag() {
        let (worker, rx) = make_worker(Arc::new(AtomicBool::new(true)));
        worker.run();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_forwarded_candidates_are_local_improvements() {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let (worker, rx) = make_worker(stop_flag.clone());
        let stats = worker.stats.clone();
        let scorers = worker.table.scorers().clone();

        let handle = std::thread::spawn(move || worker.run());

        // Replay what the worker forwarded: every item must improve a fresh
        // table fed in the same order.
        let mut replay = ScoreTable::new(scorers);
        for _ in 0..10 {
            let candidate = rx.recv().unwrap().unwrap();
            assert!(replay.offer(&candidate).is_improving());
        }

        stop_flag.store(true, Ordering::Relaxed);
        drop(rx);
        handle.join().unwrap();
        assert!(stats.total_scored() >= stats.total_forwarded());
    }
}
