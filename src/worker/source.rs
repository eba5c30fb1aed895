//! Endless stream of derived-address candidates.

use std::fmt;
use std::sync::Arc;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use secp256k1::{Secp256k1, SignOnly};

use crate::crypto::{contract_address, Address, Keypair, KeygenError};

/// One derived address with the key that produced it.
#[derive(Clone)]
pub struct Candidate {
    /// The ranked address
    pub address: Address,
    /// Keypair the address was derived from, shared by all its siblings
    pub key: Arc<Keypair>,
    /// Contract-creation nonce (0 for account addresses)
    pub nonce: u64,
    /// Chained derivation depth (always 0)
    pub depth: u32,
}

impl Candidate {
    pub fn new(address: Address, key: Arc<Keypair>, nonce: u64, depth: u32) -> Self {
        Self {
            address,
            key,
            nonce,
            depth,
        }
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
            && self.nonce == other.nonce
            && self.depth == other.depth
            && self.key.private_key_bytes() == other.key.private_key_bytes()
    }
}

impl Eq for Candidate {}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("address", &self.address)
            .field("nonce", &self.nonce)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

/// Which addresses a keypair yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivationMode {
    /// The account address itself
    Account,
    /// Contract addresses for nonces `0..max_nonce`
    Contract { max_nonce: u64 },
}

impl DerivationMode {
    /// Number of candidates produced per keypair.
    pub fn candidates_per_key(self) -> u64 {
        match self {
            DerivationMode::Account => 1,
            DerivationMode::Contract { max_nonce } => max_nonce,
        }
    }
}

/// Supplier of fresh keypairs.
pub trait KeyGenerator {
    fn next_keypair(&mut self) -> Result<Keypair, KeygenError>;
}

/// Draws keypairs from a cryptographic RNG.
pub struct RngKeyGenerator<R> {
    secp: Secp256k1<SignOnly>,
    rng: R,
}

impl RngKeyGenerator<OsRng> {
    /// Generator backed by the operating system's entropy source.
    pub fn os() -> Self {
        Self::new(OsRng)
    }
}

impl<R: RngCore + CryptoRng> RngKeyGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            secp: Secp256k1::signing_only(),
            rng,
        }
    }
}

impl<R: RngCore + CryptoRng> KeyGenerator for RngKeyGenerator<R> {
    #[inline]
    fn next_keypair(&mut self) -> Result<Keypair, KeygenError> {
        Keypair::generate(&self.secp, &mut self.rng)
    }
}

/// Unbounded producer of candidates.
///
/// Never yields `None`. A keypair failure is yielded as `Some(Err(_))`; the
/// consumer is expected to stop there.
pub struct CandidateSource<K> {
    keys: K,
    mode: DerivationMode,
    current: Option<Arc<Keypair>>,
    next_nonce: u64,
    keypairs: u64,
}

impl<K: KeyGenerator> CandidateSource<K> {
    /// Creates a source drawing keys from `keys`.
    ///
    /// # Panics
    /// Panics if `mode` is contract mode with `max_nonce == 0`.
    pub fn new(keys: K, mode: DerivationMode) -> Self {
        assert!(
            mode.candidates_per_key() > 0,
            "contract mode requires max_nonce > 0"
        );
        Self {
            keys,
            mode,
            current: None,
            next_nonce: 0,
            keypairs: 0,
        }
    }

    /// Number of keypairs generated so far.
    pub fn keypairs_generated(&self) -> u64 {
        self.keypairs
    }

    fn next_candidate(&mut self) -> Result<Candidate, KeygenError> {
        let max_nonce = self.mode.candidates_per_key();
        let key = match self.current.take() {
            Some(key) if self.next_nonce < max_nonce => key,
            _ => {
                let key = Arc::new(self.keys.next_keypair()?);
                self.keypairs += 1;
                self.next_nonce = 0;
                key
            }
        };
        self.current = Some(Arc::clone(&key));

        let nonce = self.next_nonce;
        self.next_nonce += 1;

        let address = match self.mode {
            DerivationMode::Account => *key.address(),
            DerivationMode::Contract { .. } => contract_address(key.address(), nonce),
        };
        Ok(Candidate::new(address, key, nonce, 0))
    }
}

impl<K: KeyGenerator> Iterator for CandidateSource<K> {
    type Item = Result<Candidate, KeygenError>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_candidate())
    }
}
