// crates/clk_core/src/consts.rs

/// Character used to pad both ends of a word before slicing q-grams.
pub const PAD_CHAR: char = '_';

pub const DEFAULT_M: usize = 256;
pub const DEFAULT_Q: usize = 2;
pub const DEFAULT_K: usize = 3;

pub const DEFAULT_SAMPLE_SIZE: usize = 100_000;
pub const DEFAULT_SEED: u64 = 727;

/// SHA-256 digest bytes used for h1 (0..8) and h2 (8..16), read little-endian.
pub const H1_RANGE: core::ops::Range<usize> = 0..8;
pub const H2_RANGE: core::ops::Range<usize> = 8..16;
