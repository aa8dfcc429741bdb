//! Fixed-size CLK Bloom filter and its base64 text form.
//!
//! Bits are packed most-significant-bit first: bit 0 is the high bit of the
//! first byte. A filter whose size is not a multiple of 8 is zero-padded when
//! serialized, so the decoded filter is rounded up to the next whole byte.
use crate::config::EncodingParams;
use crate::errors::{ClkError, Result};
use crate::hashing::{Sha256DoubleHasher, TokenHasher};
use crate::tokens::tokenize;
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use bitvec::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClkFilter {
    bits: BitVec<u8, Msb0>,
}

impl ClkFilter {
    /// All-zero filter of `m` bits.
    pub fn new(m: usize) -> Result<Self> {
        if m == 0 {
            return Err(ClkError::InvalidArgument("filter size m must be >= 1".into()));
        }
        Ok(Self { bits: bitvec![u8, Msb0; 0; m] })
    }

    pub fn from_bits(bits: impl IntoIterator<Item = bool>) -> Self {
        Self { bits: bits.into_iter().collect() }
    }

    pub fn len(&self) -> usize { self.bits.len() }
    pub fn is_empty(&self) -> bool { self.bits.is_empty() }

    /// Bit `i`; positions past the end read as unset.
    #[inline]
    pub fn bit(&self, i: usize) -> bool {
        self.bits.get(i).map(|b| *b).unwrap_or(false)
    }

    pub fn set(&mut self, i: usize) {
        self.bits.set(i, true);
    }

    pub fn count_ones(&self) -> usize { self.bits.count_ones() }

    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Sets bit `h mod m` for each of the `k` hash values of `bytes`.
    pub fn populate<H: TokenHasher + ?Sized>(&mut self, hasher: &H, k: usize, bytes: &[u8]) {
        let m = self.bits.len() as u64;
        if m == 0 { return; }
        for h in hasher.hash_values(k, bytes) {
            self.bits.set((h % m) as usize, true);
        }
    }

    pub fn to_base64(&self) -> String {
        let mut bits = self.bits.clone();
        bits.set_uninitialized(false);
        B64.encode(bits.as_raw_slice())
    }

    /// Inverse of [`ClkFilter::to_base64`]. The result always holds a whole
    /// number of bytes.
    pub fn from_base64(s: &str) -> Result<Self> {
        let bytes = B64.decode(s.trim())?;
        Ok(Self { bits: BitVec::from_vec(bytes) })
    }
}

/// Encodes `word` into a fresh filter using the production SHA-256 hasher.
pub fn encode_word(word: &str, params: &EncodingParams) -> Result<ClkFilter> {
    encode_word_with(&Sha256DoubleHasher, word, params)
}

pub fn encode_word_with<H: TokenHasher + ?Sized>(
    hasher: &H,
    word: &str,
    params: &EncodingParams,
) -> Result<ClkFilter> {
    params.validate()?;
    let mut bf = ClkFilter::new(params.m)?;
    for token in tokenize(word, params.q)? {
        bf.populate(hasher, params.k, token.as_bytes());
    }
    Ok(bf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Fixed(Vec<u64>);
    impl TokenHasher for Fixed {
        fn hash_values(&self, k: usize, _bytes: &[u8]) -> Vec<u64> {
            self.0.iter().copied().take(k).collect()
        }
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(ClkFilter::new(0), Err(ClkError::InvalidArgument(_))));
    }

    #[test]
    fn populate_reduces_modulo_m_and_is_idempotent() {
        let mut bf = ClkFilter::new(10).unwrap();
        let h = Fixed(vec![3, 13, u64::MAX]);
        bf.populate(&h, 3, b"x");
        bf.populate(&h, 3, b"x");
        // u64::MAX % 10 == 5
        assert_eq!(bf.ones().collect::<Vec<_>>(), vec![3, 5]);
    }

    #[test]
    fn bit_zero_is_the_high_bit() {
        let mut bf = ClkFilter::new(16).unwrap();
        bf.set(0);
        bf.set(15);
        assert_eq!(bf.to_base64(), B64.encode([0x80u8, 0x01]));
    }

    #[test]
    fn odd_sizes_pad_to_whole_bytes() {
        let mut bf = ClkFilter::new(12).unwrap();
        bf.set(11);
        let back = ClkFilter::from_base64(&bf.to_base64()).unwrap();
        assert_eq!(back.len(), 16);
        assert_eq!(back.ones().collect::<Vec<_>>(), vec![11]);
        for i in 0..12 {
            assert_eq!(back.bit(i), bf.bit(i));
        }
    }

    #[test]
    fn out_of_range_bits_read_unset() {
        let bf = ClkFilter::from_bits([true, true]);
        assert!(bf.bit(1));
        assert!(!bf.bit(2));
        assert!(!bf.bit(1_000));
    }

    #[test]
    fn bad_base64_is_an_error() {
        assert!(matches!(ClkFilter::from_base64("@@not base64@@"), Err(ClkError::Decode(_))));
    }

    #[test]
    fn encode_word_is_deterministic_and_bounded() {
        let params = EncodingParams { m: 64, q: 2, k: 3 };
        let a = encode_word("smith", &params).unwrap();
        let b = encode_word("SMITH", &params).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        // 6 bigrams x 3 hashes, collisions only lower the count
        assert!(a.count_ones() >= 1 && a.count_ones() <= 18);
    }

    #[test]
    fn encode_word_validates_params() {
        let bad_k = EncodingParams { m: 64, q: 2, k: 0 };
        assert!(encode_word("smith", &bad_k).is_err());
        let bad_q = EncodingParams { m: 64, q: 0, k: 2 };
        assert!(encode_word("smith", &bad_q).is_err());
    }

    proptest! {
        #[test]
        fn base64_round_trip(bytes in proptest::collection::vec(any::<u8>(), 1..64)) {
            let bf = ClkFilter::from_bits(
                bytes.iter().flat_map(|b| (0..8).rev().map(move |i| (b >> i) & 1 == 1)),
            );
            let back = ClkFilter::from_base64(&bf.to_base64()).unwrap();
            prop_assert_eq!(back, bf);
        }
    }
}
