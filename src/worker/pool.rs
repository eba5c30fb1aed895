//! Worker pool management.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, never, Receiver, RecvTimeoutError, Sender};

use crate::crypto::KeygenError;
use crate::scorer::{ScoreTable, ScorerSet};

use super::cpu::{Forwarded, SearchStats, Worker};
use super::source::{CandidateSource, DerivationMode, KeyGenerator, RngKeyGenerator};
use super::Candidate;

/// Runs one worker per thread and merges their forwarded candidates into a
/// single stream.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Receiving end of the rendezvous channel
    forward_rx: Receiver<Forwarded>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Shared statistics
    stats: Arc<SearchStats>,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Creates a pool whose workers draw keys from the OS entropy source.
    pub fn new(
        num_workers: usize,
        scorers: Arc<ScorerSet>,
        mode: DerivationMode,
    ) -> io::Result<Self> {
        Self::spawn(num_workers, scorers, mode, |_| RngKeyGenerator::os())
    }

    /// Creates a pool with a key generator per worker built by `make_keys`.
    pub fn spawn<K, F>(
        num_workers: usize,
        scorers: Arc<ScorerSet>,
        mode: DerivationMode,
        make_keys: F,
    ) -> io::Result<Self>
    where
        K: KeyGenerator + Send + 'static,
        F: Fn(usize) -> K,
    {
        // Zero capacity: a forward blocks until the aggregator takes it.
        let (forward_tx, forward_rx) = bounded(0);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(SearchStats::new());

        let handles = Self::spawn_workers(
            num_workers,
            &scorers,
            mode,
            make_keys,
            forward_tx,
            &stop_flag,
            &stats,
        )?;

        Ok(Self {
            num_workers,
            handles: Some(handles),
            forward_rx,
            stop_flag,
            stats,
            start_time: Instant::now(),
        })
    }

    /// Spawns worker threads.
    fn spawn_workers<K, F>(
        num_workers: usize,
        scorers: &Arc<ScorerSet>,
        mode: DerivationMode,
        make_keys: F,
        forward_tx: Sender<Forwarded>,
        stop_flag: &Arc<AtomicBool>,
        stats: &Arc<SearchStats>,
    ) -> io::Result<Vec<JoinHandle<()>>>
    where
        K: KeyGenerator + Send + 'static,
        F: Fn(usize) -> K,
    {
        (0..num_workers)
            .map(|id| {
                let source = CandidateSource::new(make_keys(id), mode);
                let table = ScoreTable::new(scorers.clone());
                let forward_tx = forward_tx.clone();
                let stop_flag = stop_flag.clone();
                let stats = stats.clone();

                thread::Builder::new()
                    .name(format!("rank-worker-{}", id))
                    .spawn(move || {
                        Worker::new(id, source, table, forward_tx, stop_flag, stats).run();
                    })
            })
            .collect()
    }

    /// Waits for the next forwarded candidate.
    ///
    /// Returns `Ok(None)` if `timeout` expires or every worker has exited, and
    /// `Err` if a worker failed to generate a keypair.
    pub fn wait_for_candidate(&self, timeout: Duration) -> Result<Option<Candidate>, KeygenError> {
        match self.forward_rx.recv_timeout(timeout) {
            Ok(forwarded) => forwarded.map(Some),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                self.stop();
                Ok(None)
            }
        }
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Waits for all workers to complete.
    pub fn join(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop();
        // Hang up so workers parked in a handoff wake with a send error.
        self.forward_rx = never();
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
        }
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the current scoring rate (candidates per second).
    pub fn candidates_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.stats.total_scored() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Returns a clone of the stop flag for external use (e.g., signal handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
