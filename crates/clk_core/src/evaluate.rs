//! Scoring of attack results against the ground truth.
use crate::attack::AttackResult;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The only candidate is the true word.
    Exact,
    /// The true word is among several candidates.
    Potential,
    /// Candidates remain but the true word is not one of them.
    False,
    /// Every word was eliminated.
    NoMatch,
}

pub fn classify(result: &AttackResult) -> MatchKind {
    if result.candidates.is_empty() {
        return MatchKind::NoMatch;
    }
    if !result.candidates.contains(&result.ground_truth) {
        return MatchKind::False;
    }
    if result.candidates.len() == 1 {
        MatchKind::Exact
    } else {
        MatchKind::Potential
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub exact: usize,
    pub potential: usize,
    pub false_match: usize,
    pub no_match: usize,
}

impl Summary {
    pub fn from_results(results: &[AttackResult]) -> Self {
        let mut s = Summary::default();
        for r in results {
            s.record(classify(r));
        }
        s
    }

    pub fn record(&mut self, kind: MatchKind) {
        self.total += 1;
        match kind {
            MatchKind::Exact => self.exact += 1,
            MatchKind::Potential => self.potential += 1,
            MatchKind::False => self.false_match += 1,
            MatchKind::NoMatch => self.no_match += 1,
        }
    }

    /// `total,exact,potential,false,no_match`
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.total, self.exact, self.potential, self.false_match, self.no_match
        )
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TOTAL WORD COUNT:  {}", self.total)?;
        writeln!(f, "Exact matches:     {}", self.exact)?;
        writeln!(f, "Potential matches: {}", self.potential)?;
        writeln!(f, "False matches:     {}", self.false_match)?;
        write!(f, "No matches:        {}", self.no_match)
    }
}
