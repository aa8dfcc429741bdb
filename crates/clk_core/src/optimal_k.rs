use crate::errors::{ClkError, Result};
use crate::tokens::tokenize;

/// Hash count minimising the false-positive rate of an `m`-bit filter that
/// receives the average number of distinct q-grams per word:
/// `k = ln 2 * m / n`.
pub fn optimal_k<'a>(words: impl IntoIterator<Item = &'a str>, m: usize, q: usize) -> Result<f64> {
    if m == 0 {
        return Err(ClkError::InvalidArgument("filter size m must be >= 1".into()));
    }
    let mut count = 0usize;
    let mut tokens = 0usize;
    for w in words {
        tokens += tokenize(w, q)?.len();
        count += 1;
    }
    if count == 0 {
        return Err(ClkError::DegenerateTable("word list is empty".into()));
    }
    if tokens == 0 {
        return Err(ClkError::DegenerateTable("words produce no tokens".into()));
    }
    let avg = tokens as f64 / count as f64;
    Ok(std::f64::consts::LN_2 * m as f64 / avg)
}
