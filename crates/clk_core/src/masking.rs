//! Synthetic masked dataset: weighted draws from a plaintext frequency table,
//! encoded as CLKs and counted.
use crate::config::MaskingParams;
use crate::errors::{ClkError, Result};
use crate::filter::{encode_word_with, ClkFilter};
use crate::hashing::{Sha256DoubleHasher, TokenHasher};
use crate::table::{EncodedRecord, PlaintextRecord};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

pub fn mask_words_with_frequency(
    table: &[PlaintextRecord],
    params: &MaskingParams,
) -> Result<Vec<EncodedRecord>> {
    mask_words_with(&Sha256DoubleHasher, table, params)
}

/// Draws `params.n` words with replacement, weighted by absolute frequency,
/// and returns one record per distinct drawn word (ordered by word) holding
/// its CLK and draw count.
pub fn mask_words_with<H: TokenHasher + ?Sized>(
    hasher: &H,
    table: &[PlaintextRecord],
    params: &MaskingParams,
) -> Result<Vec<EncodedRecord>> {
    params.encoding.validate()?;
    if table.is_empty() {
        return Err(ClkError::DegenerateTable("plaintext frequency table is empty".into()));
    }
    if table.iter().all(|r| r.frequency == 0) {
        return Err(ClkError::DegenerateTable("frequencies sum to zero".into()));
    }

    let mut masks: HashMap<&str, ClkFilter> = HashMap::new();
    for rec in table {
        if !masks.contains_key(rec.word.as_str()) {
            masks.insert(&rec.word, encode_word_with(hasher, &rec.word, &params.encoding)?);
        }
    }

    let dist = WeightedIndex::new(table.iter().map(|r| r.frequency))
        .map_err(|e| ClkError::DegenerateTable(e.to_string()))?;
    let mut rng = StdRng::seed_from_u64(params.seed);

    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for _ in 0..params.n {
        let word = table[dist.sample(&mut rng)].word.as_str();
        *counts.entry(word).or_insert(0) += 1;
    }
    debug!(draws = params.n, distinct = counts.len(), "sampled masked words");

    let mut out = Vec::with_capacity(counts.len());
    for (word, count) in counts {
        let filter = masks
            .get(word)
            .cloned()
            .ok_or_else(|| ClkError::InvalidArgument(format!("no mask for {word:?}")))?;
        out.push(EncodedRecord { filter, frequency: count, ground_truth: word.to_string() });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncodingParams;
    use crate::filter::encode_word;

    fn params(n: usize, seed: u64) -> MaskingParams {
        MaskingParams { n, seed, encoding: EncodingParams { m: 64, q: 2, k: 3 } }
    }

    fn table() -> Vec<PlaintextRecord> {
        vec![
            PlaintextRecord::new("MUELLER", 50),
            PlaintextRecord::new("SCHMIDT", 30),
            PlaintextRecord::new("NEVER", 0),
            PlaintextRecord::new("FISCHER", 20),
        ]
    }

    #[test]
    fn counts_add_up_and_rows_are_sorted() {
        let out = mask_words_with_frequency(&table(), &params(1_000, 727)).unwrap();
        let total: u64 = out.iter().map(|r| r.frequency).sum();
        assert_eq!(total, 1_000);
        let words: Vec<&str> = out.iter().map(|r| r.ground_truth.as_str()).collect();
        let mut sorted = words.clone();
        sorted.sort();
        assert_eq!(words, sorted);
        assert!(!words.contains(&"NEVER"));
        for r in &out {
            assert_eq!(r.filter, encode_word(&r.ground_truth, &params(0, 0).encoding).unwrap());
        }
    }

    #[test]
    fn same_seed_same_sample() {
        let a = mask_words_with_frequency(&table(), &params(500, 9)).unwrap();
        let b = mask_words_with_frequency(&table(), &params(500, 9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn heavier_words_are_drawn_more() {
        let out = mask_words_with_frequency(&table(), &params(10_000, 1)).unwrap();
        let freq = |w: &str| out.iter().find(|r| r.ground_truth == w).map(|r| r.frequency).unwrap();
        assert!(freq("MUELLER") > freq("SCHMIDT"));
        assert!(freq("SCHMIDT") > freq("FISCHER"));
    }

    #[test]
    fn degenerate_tables_fail_fast() {
        assert!(matches!(
            mask_words_with_frequency(&[], &params(10, 1)),
            Err(ClkError::DegenerateTable(_))
        ));
        let zeros = vec![PlaintextRecord::new("a", 0), PlaintextRecord::new("b", 0)];
        assert!(matches!(
            mask_words_with_frequency(&zeros, &params(10, 1)),
            Err(ClkError::DegenerateTable(_))
        ));
        let bad = MaskingParams { encoding: EncodingParams { m: 0, q: 2, k: 3 }, ..params(10, 1) };
        assert!(matches!(
            mask_words_with_frequency(&table(), &bad),
            Err(ClkError::InvalidArgument(_))
        ));
    }
}
