pub mod consts;
pub mod errors;
pub mod config;
pub mod tokens;
pub mod hashing;
pub mod filter;
pub mod table;
pub mod align;
pub mod diagnostic;
pub mod attack;
pub mod evaluate;
pub mod masking;
pub mod optimal_k;

pub use config::{AttackConfig, EarlyExitPolicy, EncodingParams, MaskingParams};
pub use errors::{ClkError, Result};
pub use tokens::{tokenize, Token, TokenIndex, TokenSet};
pub use hashing::{Sha256DoubleHasher, TokenHasher};
pub use filter::{encode_word, encode_word_with, ClkFilter};
pub use table::{EncodedRecord, PlaintextRecord};
pub use align::Alignment;
pub use diagnostic::DiagnosticTokens;
pub use attack::{run_attack, AttackResult, FrequencyAttack};
pub use evaluate::{classify, MatchKind, Summary};
pub use masking::{mask_words_with, mask_words_with_frequency};
pub use optimal_k::optimal_k;
