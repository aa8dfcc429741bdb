//! Candidate elimination: the frequency-alignment attack on a CLK table.
use crate::align::Alignment;
use crate::config::{AttackConfig, EarlyExitPolicy};
use crate::diagnostic::DiagnosticTokens;
use crate::errors::{ClkError, Result};
use crate::filter::ClkFilter;
use crate::table::{EncodedRecord, PlaintextRecord};
use crate::tokens::TokenIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Surviving plaintext candidates for one encoded record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResult {
    pub ground_truth: String,
    pub candidates: BTreeSet<String>,
}

impl AttackResult {
    pub fn joined_candidates(&self) -> String {
        self.candidates.iter().map(String::as_str).collect::<Vec<_>>().join(",")
    }
}

/// Attack state shared by every record of one run: the word -> token index,
/// the diagnostic sets and the full vocabulary. Read-only once prepared.
#[derive(Debug, Clone)]
pub struct FrequencyAttack {
    config: AttackConfig,
    index: TokenIndex,
    diagnostics: DiagnosticTokens,
    vocabulary: BTreeSet<String>,
}

impl FrequencyAttack {
    pub fn prepare(
        plaintext: &[PlaintextRecord],
        encoded: &[EncodedRecord],
        config: AttackConfig,
    ) -> Result<Self> {
        Self::from_alignment(&Alignment::new(plaintext, encoded), config)
    }

    /// Fails on an empty plaintext table or on filters of mixed width.
    pub fn from_alignment(alignment: &Alignment<'_>, config: AttackConfig) -> Result<Self> {
        config.validate()?;
        if alignment.plaintext().is_empty() {
            return Err(ClkError::DegenerateTable("plaintext frequency table is empty".into()));
        }
        alignment.check_widths()?;
        let index = TokenIndex::build(alignment.plaintext().iter().map(|r| r.word.as_str()), config.q)?;
        let diagnostics = DiagnosticTokens::derive(alignment, &index);
        let vocabulary = alignment.plaintext().iter().map(|r| r.word.clone()).collect();
        Ok(Self { config, index, diagnostics, vocabulary })
    }

    pub fn diagnostics(&self) -> &DiagnosticTokens { &self.diagnostics }

    /// Words whose tokens are consistent with every set bit of `filter` that
    /// was examined before the early-exit policy stopped the scan.
    ///
    /// Unset bits carry no evidence and are skipped. A set bit removes every
    /// word sharing no token with that bit's diagnostic set.
    pub fn candidates_for(&self, filter: &ClkFilter) -> BTreeSet<String> {
        let mut candidates = self.vocabulary.clone();
        for i in filter.ones() {
            let Some(diag) = self.diagnostics.get(i) else { break };
            candidates.retain(|w| !self.index.tokens_of(w).is_disjoint(diag));

            let stop = match self.config.early_exit {
                EarlyExitPolicy::SingletonDiagnostic => diag.len() <= 1,
                EarlyExitPolicy::Exhaustive => candidates.is_empty(),
            };
            if stop {
                break;
            }
        }
        candidates
    }

    pub fn attack_record(&self, record: &EncodedRecord) -> AttackResult {
        AttackResult {
            ground_truth: record.ground_truth.clone(),
            candidates: self.candidates_for(&record.filter),
        }
    }
}

/// Runs the full attack. Results follow the encoded table in descending
/// frequency order.
pub fn run_attack(
    plaintext: &[PlaintextRecord],
    encoded: &[EncodedRecord],
    config: AttackConfig,
) -> Result<Vec<AttackResult>> {
    let alignment = Alignment::new(plaintext, encoded);
    let attack = FrequencyAttack::from_alignment(&alignment, config)?;
    debug!(
        plaintext = plaintext.len(),
        encoded = encoded.len(),
        aligned = alignment.len(),
        words = attack.index.len(),
        bits = attack.diagnostics().bit_len(),
        "aligned frequency tables"
    );
    let results: Vec<AttackResult> =
        alignment.encoded().iter().map(|r| attack.attack_record(r)).collect();
    info!(records = results.len(), policy = ?config.early_exit, "attack finished");
    Ok(results)
}
