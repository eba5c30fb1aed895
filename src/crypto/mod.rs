//! Cryptographic primitives used by the search.
//!
//! This module provides:
//! - Random secp256k1 keypairs and their account addresses
//! - CREATE contract address derivation (sender + nonce)
//! - Keccak-256 and address display helpers

mod address;
mod contract;
mod keypair;

pub use address::{Address, ParseAddressError, ADDRESS_LEN, ADDRESS_NIBBLES};
pub use contract::contract_address;
pub use keypair::{account_address, Keypair, KeygenError};

use tiny_keccak::{Hasher, Keccak};

/// Keccak-256 of arbitrary bytes (output 32 bytes).
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(input);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}
