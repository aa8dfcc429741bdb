//! Double-hashing scheme behind the CLK encoder.
//!
//! Wire contract: h1 and h2 are the first two 8-byte chunks of the SHA-256
//! digest, read little-endian. Encoder and attacker must agree on this.
use crate::consts::{H1_RANGE, H2_RANGE};
use sha2::{Digest, Sha256};

/// Produces the `k` raw hash values used to place one element into a filter.
pub trait TokenHasher {
    fn hash_values(&self, k: usize, bytes: &[u8]) -> Vec<u64>;
}

/// `h_i = h1 + (i + 1) * h2 (mod 2^64)` over a SHA-256 digest.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256DoubleHasher;

#[inline]
fn le_u64(b: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(b);
    u64::from_le_bytes(buf)
}

pub fn double_hash(h1: u64, h2: u64, k: usize) -> impl Iterator<Item = u64> {
    (0..k as u64).map(move |i| h1.wrapping_add(i.wrapping_add(1).wrapping_mul(h2)))
}

impl TokenHasher for Sha256DoubleHasher {
    fn hash_values(&self, k: usize, bytes: &[u8]) -> Vec<u64> {
        let dig = Sha256::digest(bytes);
        let h1 = le_u64(&dig[H1_RANGE]);
        let h2 = le_u64(&dig[H2_RANGE]);
        double_hash(h1, h2, k).collect()
    }
}
