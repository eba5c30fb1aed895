//! Runtime configuration for the address search.

use clap::Parser;
use log::warn;

use crate::report::LineFormat;
use crate::scorer::{ScorerKind, ScorerSet};
use crate::worker::DerivationMode;

/// Parallel Ethereum address search ranked by scoring heuristics
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Number of worker threads
    #[arg(short = 'w', long, default_value = "2")]
    pub threads: usize,

    /// Derive addresses for deployed contracts instead of accounts
    #[arg(short = 'c', long, default_value = "false")]
    pub contract: bool,

    /// Number of nonces to try per key when deriving contract addresses (exclusive bound)
    #[arg(short = 'm', long, default_value = "32")]
    pub max_nonce: u64,

    /// Comma-separated scorers: least, ascii, ascending, strict-ascending
    #[arg(short = 's', long, value_delimiter = ',', default_value = "ascii")]
    pub scorers: Vec<ScorerKind>,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "5")]
    pub report_interval: u64,

    /// Log every improvement with its scores
    #[arg(short = 'v', long, default_value = "false")]
    pub verbose: bool,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::NoThreads);
        }

        if self.contract && self.max_nonce == 0 {
            return Err(ConfigError::NoNonces);
        }

        if self.scorers.is_empty() {
            return Err(ConfigError::NoScorers);
        }

        if self.report_interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        let cores = num_cpus::get();
        if self.threads > cores {
            warn!(
                "{} threads requested but only {} cores available",
                self.threads, cores
            );
        }

        Ok(())
    }

    /// Returns how candidates are derived from each keypair.
    pub fn derivation_mode(&self) -> DerivationMode {
        if self.contract {
            DerivationMode::Contract {
                max_nonce: self.max_nonce,
            }
        } else {
            DerivationMode::Account
        }
    }

    /// Returns the active scorers.
    pub fn scorer_set(&self) -> ScorerSet {
        ScorerSet::new(self.scorers.iter().copied())
    }

    /// Returns the layout of result lines.
    pub fn line_format(&self) -> LineFormat {
        if self.contract {
            LineFormat::Contract
        } else {
            LineFormat::Account
        }
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("thread count must be positive")]
    NoThreads,
    #[error("--max-nonce must be positive in contract mode")]
    NoNonces,
    #[error("at least one scorer is required")]
    NoScorers,
    #[error("report interval must be positive")]
    ZeroInterval,
}
