//! Per-bit diagnostic token sets.
//!
//! For bit `i`, the aligned plaintext words split into those whose partner
//! filter has bit `i` set (P) and those where it is unset (N). The diagnostic
//! set is `tokens(P) - tokens(N)`: tokens seen only next to a set bit.
use crate::align::Alignment;
use crate::tokens::{TokenIndex, TokenSet};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticTokens {
    per_bit: Vec<TokenSet>,
}

impl DiagnosticTokens {
    pub fn derive(alignment: &Alignment<'_>, index: &TokenIndex) -> Self {
        let bit_len = alignment.bit_len();
        let mut per_bit = Vec::with_capacity(bit_len);

        for i in 0..bit_len {
            let mut positive: TokenSet = TokenSet::new();
            let mut negative: TokenSet = TokenSet::new();
            for (plain, enc) in alignment.pairs() {
                let tokens = index.tokens_of(&plain.word);
                let side = if enc.filter.bit(i) { &mut positive } else { &mut negative };
                side.extend(tokens.iter().cloned());
            }
            per_bit.push(positive.difference(&negative).cloned().collect());
        }

        debug!(
            bits = bit_len,
            rows = alignment.len(),
            informative = per_bit.iter().filter(|s: &&TokenSet| !s.is_empty()).count(),
            "derived diagnostic token sets"
        );
        Self { per_bit }
    }

    pub fn bit_len(&self) -> usize { self.per_bit.len() }

    /// Diagnostic tokens of bit `i`, `None` past the widest filter.
    pub fn get(&self, i: usize) -> Option<&TokenSet> { self.per_bit.get(i) }
}
