//! CREATE contract address computation.
//!
//!   address = keccak256(rlp([sender, nonce]))[12..32]

use super::{keccak256, Address};

/// RLP short-string prefix for a 20-byte string.
const RLP_ADDRESS_PREFIX: u8 = 0x80 + 20;

/// Computes the address of the contract `sender` deploys at `nonce`.
pub fn contract_address(sender: &Address, nonce: u64) -> Address {
    // 1 (list header) + 21 (address) + at most 9 (nonce)
    let mut preimage = [0u8; 31];
    preimage[1] = RLP_ADDRESS_PREFIX;
    preimage[2..22].copy_from_slice(sender.as_bytes());
    let nonce_len = encode_nonce(nonce, &mut preimage[22..]);

    let payload_len = 21 + nonce_len;
    preimage[0] = 0xc0 + payload_len as u8;

    let hash = keccak256(&preimage[..1 + payload_len]);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..32]);
    Address::from_bytes(addr)
}

/// Writes `nonce` as an RLP integer into `out`, returning the bytes written.
fn encode_nonce(nonce: u64, out: &mut [u8]) -> usize {
    match nonce {
        0 => {
            out[0] = 0x80;
            1
        }
        1..=0x7f => {
            out[0] = nonce as u8;
            1
        }
        _ => {
            let be = nonce.to_be_bytes();
            let skip = (nonce.leading_zeros() / 8) as usize;
            let len = be.len() - skip;
            out[0] = 0x80 + len as u8;
            out[1..=len].copy_from_slice(&be[skip..]);
            1 + len
        }
    }
}
