//! secp256k1 keypair generation and account address derivation.

use std::fmt;

use rand::{CryptoRng, RngCore};
use secp256k1::{PublicKey, Secp256k1, SecretKey, Signing};

use super::{keccak256, Address};

/// Errors raised while producing a keypair.
#[derive(Debug, thiserror::Error)]
pub enum KeygenError {
    /// The randomness source could not deliver bytes.
    #[error("entropy source unavailable: {0}")]
    Entropy(#[from] rand::Error),
    /// The supplied secret is not a valid secp256k1 scalar.
    #[error("invalid secret key: {0}")]
    InvalidSecretKey(#[from] secp256k1::Error),
}

/// A secp256k1 private key together with its account address.
#[derive(Clone)]
pub struct Keypair {
    /// The private key bytes (32 bytes)
    secret_key: [u8; 32],
    /// The derived account address
    address: Address,
}

impl Keypair {
    /// Draws a uniformly random keypair from `rng`.
    ///
    /// Byte strings outside the curve order are discarded and redrawn. Any
    /// failure of the RNG itself is returned as [`KeygenError::Entropy`].
    pub fn generate<C, R>(secp: &Secp256k1<C>, rng: &mut R) -> Result<Self, KeygenError>
    where
        C: Signing,
        R: RngCore + CryptoRng,
    {
        let mut bytes = [0u8; 32];
        loop {
            rng.try_fill_bytes(&mut bytes)?;
            if let Ok(secret_key) = SecretKey::from_slice(&bytes) {
                return Ok(Self::from_secret(secp, &secret_key));
            }
        }
    }

    /// Rebuilds a keypair from an existing secret key.
    pub fn from_secret_key(secret_bytes: [u8; 32]) -> Result<Self, KeygenError> {
        let secp = Secp256k1::signing_only();
        let secret_key = SecretKey::from_slice(&secret_bytes)?;
        Ok(Self::from_secret(&secp, &secret_key))
    }

    fn from_secret<C: Signing>(secp: &Secp256k1<C>, secret_key: &SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(secp, secret_key);
        Self {
            secret_key: secret_key.secret_bytes(),
            address: account_address(&public_key),
        }
    }

    /// Returns the private key as a hex string (without 0x prefix).
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key)
    }

    /// Returns the private key bytes.
    pub fn private_key_bytes(&self) -> &[u8; 32] {
        &self.secret_key
    }

    /// Returns the account address of this keypair.
    #[inline]
    pub fn address(&self) -> &Address {
        &self.address
    }
}

// Never print the secret through Debug.
impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Derives an Ethereum account address from a secp256k1 public key.
///
/// Keccak-256 over the 64-byte uncompressed key (0x04 prefix dropped), last
/// 20 bytes.
pub fn account_address(public_key: &PublicKey) -> Address {
    let public_key_bytes = public_key.serialize_uncompressed();
    let hash = keccak256(&public_key_bytes[1..]);

    let mut address_bytes = [0u8; 20];
    address_bytes.copy_from_slice(&hash[12..]);
    Address::from_bytes(address_bytes)
}
