//! Output of globally improving candidates.

use std::io::{self, Write};

use crate::worker::Candidate;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write result: {0}")]
    Io(#[from] io::Error),
}

/// Receives each candidate that improves the global best.
pub trait Reporter {
    fn report(&mut self, candidate: &Candidate) -> Result<(), ReportError>;
}

/// Column layout of result lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    /// address, nonce, private key
    Account,
    /// address, address as text, nonce, depth, private key
    Contract,
}

/// Writes one tab-separated line per candidate and flushes it.
pub struct LineReporter<W> {
    out: W,
    format: LineFormat,
}

impl LineReporter<io::Stdout> {
    pub fn stdout(format: LineFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write> LineReporter<W> {
    pub fn new(out: W, format: LineFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for LineReporter<W> {
    fn report(&mut self, candidate: &Candidate) -> Result<(), ReportError> {
        let address = candidate.address.to_checksum();
        let key = candidate.key.private_key_hex();
        match self.format {
            LineFormat::Account => writeln!(self.out, "{}\t{}\t{}", address, candidate.nonce, key)?,
            LineFormat::Contract => writeln!(
                self.out,
                "{}\t{}\t{}\t{}\t{}",
                address,
                candidate.address.to_quoted_text(),
                candidate.nonce,
                candidate.depth,
                key
            )?,
        }
        self.out.flush()?;
        Ok(())
    }
}
