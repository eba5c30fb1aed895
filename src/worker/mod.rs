//! The generate → derive → score → reduce pipeline.
//!
//! This module provides:
//! - Candidate sources (one per worker, never shared)
//! - Multi-threaded workers with private best-so-far tables
//! - A rendezvous fan-in to the single global aggregator

mod aggregator;
mod cpu;
mod pool;
mod source;

pub use aggregator::Aggregator;
pub use cpu::{Forwarded, SearchStats, Worker};
pub use pool::WorkerPool;
pub use source::{Candidate, CandidateSource, DerivationMode, KeyGenerator, RngKeyGenerator};
