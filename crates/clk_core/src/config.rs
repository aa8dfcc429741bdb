use crate::consts::{DEFAULT_K, DEFAULT_M, DEFAULT_Q, DEFAULT_SAMPLE_SIZE, DEFAULT_SEED};
use crate::errors::{ClkError, Result};
use crate::tokens::check_q;
use serde::{Deserialize, Serialize};

/// Filter size `m`, token length `q` and hash count `k` of the CLK encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingParams {
    pub m: usize,
    pub q: usize,
    pub k: usize,
}

impl Default for EncodingParams {
    fn default() -> Self {
        Self { m: DEFAULT_M, q: DEFAULT_Q, k: DEFAULT_K }
    }
}

impl EncodingParams {
    pub fn validate(&self) -> Result<()> {
        if self.m == 0 {
            return Err(ClkError::InvalidArgument("filter size m must be >= 1".into()));
        }
        if self.k == 0 {
            return Err(ClkError::InvalidArgument("hash count k must be >= 1".into()));
        }
        check_q(self.q)
    }
}

/// When the eliminator stops looking at further set bits of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarlyExitPolicy {
    /// Stop after the first set bit whose diagnostic token set has at most
    /// one token.
    #[default]
    SingletonDiagnostic,
    /// Visit every set bit; stop only once no candidates remain.
    Exhaustive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackConfig {
    pub q: usize,
    #[serde(default)]
    pub early_exit: EarlyExitPolicy,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self { q: DEFAULT_Q, early_exit: EarlyExitPolicy::default() }
    }
}

impl AttackConfig {
    pub fn validate(&self) -> Result<()> {
        check_q(self.q)
    }
}

/// Parameters of the synthetic masked dataset drawn from a frequency table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskingParams {
    pub n: usize,
    pub seed: u64,
    #[serde(flatten)]
    pub encoding: EncodingParams,
}

impl Default for MaskingParams {
    fn default() -> Self {
        Self { n: DEFAULT_SAMPLE_SIZE, seed: DEFAULT_SEED, encoding: EncodingParams::default() }
    }
}
