//! q-gram tokenizer and the per-run word -> token lookup.
use crate::consts::PAD_CHAR;
use crate::errors::{ClkError, Result};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Uppercased q-gram sliced from a padded word.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str { &self.0 }
    pub fn as_bytes(&self) -> &[u8] { self.0.as_bytes() }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

pub type TokenSet = BTreeSet<Token>;

static NO_TOKENS: TokenSet = TokenSet::new();

pub(crate) fn check_q(q: usize) -> Result<()> {
    if q < 1 {
        return Err(ClkError::InvalidArgument("token size q must be >= 1".into()));
    }
    Ok(())
}

/// Splits `word` into its set of q-grams.
///
/// The word is padded with `q - 1` copies of [`PAD_CHAR`] on both sides, so a
/// non-empty word always yields at least one token. Windows are taken over
/// characters, not bytes.
pub fn tokenize(word: &str, q: usize) -> Result<TokenSet> {
    check_q(q)?;
    let pad = q - 1;
    let mut chars: Vec<char> = Vec::with_capacity(word.len() + 2 * pad);
    chars.extend(std::iter::repeat(PAD_CHAR).take(pad));
    chars.extend(word.chars());
    chars.extend(std::iter::repeat(PAD_CHAR).take(pad));

    let mut out = TokenSet::new();
    if chars.len() < q {
        return Ok(out);
    }
    for w in chars.windows(q) {
        let gram: String = w.iter().collect();
        out.insert(Token(gram.to_uppercase()));
    }
    Ok(out)
}

/// Word -> token lookup built once per attack run and shared by the
/// derivation and elimination steps.
#[derive(Debug, Default, Clone)]
pub struct TokenIndex {
    by_word: HashMap<String, TokenSet>,
}

impl TokenIndex {
    pub fn build<'a>(words: impl IntoIterator<Item = &'a str>, q: usize) -> Result<Self> {
        check_q(q)?;
        let mut by_word = HashMap::new();
        for w in words {
            if !by_word.contains_key(w) {
                by_word.insert(w.to_string(), tokenize(w, q)?);
            }
        }
        Ok(Self { by_word })
    }

    pub fn len(&self) -> usize { self.by_word.len() }
    pub fn is_empty(&self) -> bool { self.by_word.is_empty() }

    /// Tokens of `word`; a word outside the index has none.
    pub fn tokens_of(&self, word: &str) -> &TokenSet {
        self.by_word.get(word).unwrap_or(&NO_TOKENS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strs(set: &TokenSet) -> Vec<&str> {
        set.iter().map(|t| t.as_str()).collect()
    }

    #[test]
    fn bigrams_are_padded_and_uppercased() {
        let t = tokenize("ab", 2).unwrap();
        assert_eq!(strs(&t), vec!["AB", "B_", "_A"]);
    }

    #[test]
    fn repeated_grams_count_once() {
        let t = tokenize("aaaa", 2).unwrap();
        assert_eq!(strs(&t), vec!["AA", "A_", "_A"]);
    }

    #[test]
    fn unigrams_have_no_padding() {
        let t = tokenize("Hello", 1).unwrap();
        assert_eq!(strs(&t), vec!["E", "H", "L", "O"]);
    }

    #[test]
    fn trigrams_on_short_word() {
        let t = tokenize("x", 3).unwrap();
        assert_eq!(strs(&t), vec!["X__", "_X_", "__X"]);
    }

    #[test]
    fn windows_follow_chars_not_bytes() {
        let t = tokenize("äb", 2).unwrap();
        assert_eq!(strs(&t), vec!["B_", "_Ä", "ÄB"]);
    }

    #[test]
    fn zero_q_is_rejected() {
        assert!(matches!(tokenize("abc", 0), Err(ClkError::InvalidArgument(_))));
        assert!(TokenIndex::build(["abc"], 0).is_err());
    }

    #[test]
    fn index_caches_each_word_once() {
        let idx = TokenIndex::build(["ab", "cd", "ab"], 2).unwrap();
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.tokens_of("cd"), &tokenize("cd", 2).unwrap());
        assert!(idx.tokens_of("zz").is_empty());
    }

    proptest! {
        #[test]
        fn case_does_not_matter(s in "[a-zA-Z0-9 ]{0,16}", q in 1usize..5) {
            let plain = tokenize(&s, q).unwrap();
            prop_assert_eq!(&plain, &tokenize(&s.to_uppercase(), q).unwrap());
            prop_assert_eq!(&plain, &tokenize(&s.to_lowercase(), q).unwrap());
        }

        #[test]
        fn non_empty_word_has_tokens(s in "\\PC{1,16}", q in 1usize..6) {
            let t = tokenize(&s, q).unwrap();
            prop_assert!(!t.is_empty());
        }
    }
}
