//! Rank alignment of the plaintext and encoded frequency tables.
//!
//! Both tables are ordered by descending frequency (stable, ties keep their
//! input order) and paired row by row. Rows past the shorter table are not
//! paired. Equal frequency values are never matched directly; only rank is.
use crate::errors::{ClkError, Result};
use crate::table::{EncodedRecord, PlaintextRecord};

/// Stable descending sort on a frequency key.
pub fn sort_by_frequency_desc<T>(items: &mut [T], freq: impl Fn(&T) -> u64) {
    items.sort_by(|a, b| freq(b).cmp(&freq(a)));
}

#[derive(Debug, Clone)]
pub struct Alignment<'a> {
    plaintext: Vec<&'a PlaintextRecord>,
    encoded: Vec<&'a EncodedRecord>,
}

impl<'a> Alignment<'a> {
    pub fn new(plaintext: &'a [PlaintextRecord], encoded: &'a [EncodedRecord]) -> Self {
        let mut plaintext: Vec<&PlaintextRecord> = plaintext.iter().collect();
        let mut encoded: Vec<&EncodedRecord> = encoded.iter().collect();
        sort_by_frequency_desc(&mut plaintext, |r| r.frequency);
        sort_by_frequency_desc(&mut encoded, |r| r.frequency);
        Self { plaintext, encoded }
    }

    /// Number of paired rows, `min(|plaintext|, |encoded|)`.
    pub fn len(&self) -> usize {
        self.plaintext.len().min(self.encoded.len())
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Rank-paired rows, highest frequency first.
    pub fn pairs(&self) -> impl Iterator<Item = (&'a PlaintextRecord, &'a EncodedRecord)> + '_ {
        self.plaintext.iter().copied().zip(self.encoded.iter().copied())
    }

    /// The whole plaintext table in rank order.
    pub fn plaintext(&self) -> &[&'a PlaintextRecord] { &self.plaintext }

    /// The whole encoded table in rank order, including unpaired rows.
    pub fn encoded(&self) -> &[&'a EncodedRecord] { &self.encoded }

    /// Filter width of the encoded table, 0 when it is empty.
    pub fn bit_len(&self) -> usize {
        self.encoded.first().map_or(0, |r| r.filter.len())
    }

    /// Fails unless every encoded filter has the same width.
    pub fn check_widths(&self) -> Result<()> {
        let m = self.bit_len();
        match self.encoded.iter().find(|r| r.filter.len() != m) {
            Some(r) => Err(ClkError::InvalidArgument(format!(
                "encoded table mixes {m}-bit and {}-bit filters",
                r.filter.len()
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ClkFilter;
    use proptest::prelude::*;

    fn enc(freq: u64, word: &str, m: usize) -> EncodedRecord {
        EncodedRecord { filter: ClkFilter::new(m).unwrap(), frequency: freq, ground_truth: word.into() }
    }

    #[test]
    fn pairs_by_rank_not_value() {
        let plain = vec![
            PlaintextRecord::new("b", 5),
            PlaintextRecord::new("a", 900),
            PlaintextRecord::new("c", 1),
        ];
        let encoded = vec![enc(3, "x", 8), enc(40, "y", 8)];
        let al = Alignment::new(&plain, &encoded);
        assert_eq!(al.len(), 2);
        let got: Vec<(&str, &str)> =
            al.pairs().map(|(p, e)| (p.word.as_str(), e.ground_truth.as_str())).collect();
        assert_eq!(got, vec![("a", "y"), ("b", "x")]);
        assert_eq!(al.plaintext().len(), 3);
        assert_eq!(al.bit_len(), 8);
        assert!(al.check_widths().is_ok());
    }

    #[test]
    fn mixed_widths_are_rejected() {
        let plain = vec![PlaintextRecord::new("a", 1)];
        let encoded = vec![enc(3, "x", 8), enc(40, "y", 16)];
        let al = Alignment::new(&plain, &encoded);
        assert!(matches!(al.check_widths(), Err(ClkError::InvalidArgument(_))));
    }

    #[test]
    fn ties_keep_input_order() {
        let plain = vec![
            PlaintextRecord::new("first", 2),
            PlaintextRecord::new("top", 3),
            PlaintextRecord::new("second", 2),
        ];
        let al = Alignment::new(&plain, &[]);
        let order: Vec<&str> = al.plaintext().iter().map(|r| r.word.as_str()).collect();
        assert_eq!(order, vec!["top", "first", "second"]);
        assert!(al.is_empty());
        assert_eq!(al.bit_len(), 0);
        assert!(al.check_widths().is_ok());
    }

    proptest! {
        #[test]
        fn sorting_sorted_input_is_a_no_op(mut freqs in proptest::collection::vec(0u64..50, 0..40)) {
            freqs.sort_by(|a, b| b.cmp(a));
            let mut tagged: Vec<(usize, u64)> = freqs.iter().copied().enumerate().collect();
            let before = tagged.clone();
            sort_by_frequency_desc(&mut tagged, |t| t.1);
            prop_assert_eq!(tagged, before);
        }
    }
}
