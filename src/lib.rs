//! # eth_vanity_rank
//!
//! Parallel search for Ethereum addresses ranked by pluggable heuristics.
//! Instead of matching a fixed pattern, every active scorer keeps the best
//! address seen so far and each new best is reported as it is found.
//!
//! ## Architecture
//!
//! - `crypto`: Key generation, account and contract address derivation
//! - `scorer`: Ranking policies and best-so-far tables
//! - `worker`: Candidate sources, per-thread workers, global aggregator
//! - `report`: Result line output
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod report;
pub mod scorer;
pub mod worker;

pub use config::{Config, ConfigError};
pub use crypto::{Address, Keypair, KeygenError};
pub use report::{LineFormat, LineReporter, ReportError, Reporter};
pub use scorer::{Improvement, ScoreTable, Scorer, ScorerKind, ScorerSet, Verdict};
pub use worker::{Aggregator, Candidate, CandidateSource, DerivationMode, WorkerPool};
