//! Ethereum address ranking search CLI
//!
//! Usage:
//!   eth_vanity_rank                          # Most printable-ASCII account address
//!   eth_vanity_rank -s least,ascending -w 8  # Two scorers, eight threads
//!   eth_vanity_rank --contract -m 64         # Rank contract addresses, nonces 0..64
//!
//! Result lines go to stdout; logs go to stderr.

use std::process;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::{error, info, warn, LevelFilter};

use eth_vanity_rank::{Aggregator, Config, LineReporter, Reporter, WorkerPool};

fn main() {
    let config = Config::parse();
    init_logger(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        process::exit(1);
    }

    let scorers = Arc::new(config.scorer_set());
    let mode = config.derivation_mode();

    info!("Scorers: {}", scorers);
    info!(
        "Mode:    {}",
        if config.contract {
            format!("contract (nonces 0..{})", config.max_nonce)
        } else {
            "account".to_string()
        }
    );
    info!("Workers: {}", config.threads);

    let pool = match WorkerPool::new(config.threads, scorers.clone(), mode) {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to spawn workers: {}", e);
            process::exit(1);
        }
    };

    let stop_flag = pool.stop_flag_clone();
    if let Err(e) = ctrlc::set_handler(move || stop_flag.store(true, Ordering::Relaxed)) {
        warn!("Could not install Ctrl-C handler: {}", e);
    }

    let mut aggregator = Aggregator::new(scorers, LineReporter::stdout(config.line_format()));
    let report_interval = Duration::from_secs(config.report_interval);

    info!("Searching... (Press Ctrl+C to stop)");

    while !pool.is_stopped() {
        match pool.wait_for_candidate(report_interval) {
            Ok(Some(candidate)) => {
                if let Err(e) = aggregator.offer(candidate) {
                    warn!("{}", e);
                }
            }
            Ok(None) => print_progress(&pool),
            Err(e) => {
                error!("Error generating keypair: {}", e);
                process::exit(1);
            }
        }
    }

    print_summary(&pool, &aggregator);
    pool.join();
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn print_progress(pool: &WorkerPool) {
    let stats = pool.stats();
    info!(
        "[{:>4}s] Scored {} candidates ({}/s), {} keys, {} forwarded",
        pool.elapsed().as_secs(),
        format_number(stats.total_scored()),
        format_number(pool.candidates_per_second() as u64),
        format_number(stats.total_keypairs()),
        stats.total_forwarded()
    );
}

fn print_summary<R: Reporter>(pool: &WorkerPool, aggregator: &Aggregator<R>) {
    let stats = pool.stats();
    info!("--- Final Statistics ---");
    info!("Candidates scored: {}", format_number(stats.total_scored()));
    info!("Keypairs:          {}", format_number(stats.total_keypairs()));
    info!("Reported:          {}", aggregator.reported());
    info!("Time elapsed:      {:.2}s", pool.elapsed().as_secs_f64());
    info!(
        "Average speed:     {}/s",
        format_number(pool.candidates_per_second() as u64)
    );
    for (kind, best) in aggregator.table().iter() {
        if let Some(best) = best {
            info!(
                "Best {:<16} {} ({})",
                kind,
                best.address,
                kind.describe(&best.address)
            );
        }
    }
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}
