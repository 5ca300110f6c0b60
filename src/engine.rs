//! The main module that contains the [`Engine`] struct and its ranking
//! operations.
use std::sync::Arc;

use displaydoc::Display;
use num::BigUint;
use num::Integer;
use num::ToPrimitive;
use num::Zero;

use crate::config::Config;
use crate::dfa::Dfa;
use crate::regex;

#[derive(Debug, thiserror::Error)]
/// Represents the error type for the [`Engine`] creation.
pub enum CreateEngineError {
    #[error("{0}")] // inherits the error message from the wrapped CompileRegexError
    /// A wrapper for the [`CompileRegexError`](crate::regex::CompileRegexError) error type.
    RegexError(#[from] regex::CompileRegexError),
    #[error("{0}")] // inherits the error message from the wrapped CreateDfaError
    /// A wrapper for the [`CreateDfaError`](crate::dfa::CreateDfaError) error type.
    DfaError(#[from] crate::dfa::CreateDfaError),
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
/// Represents the error when an [`Engine`] ranks a word.
pub enum RankError {
    /// The word is longer than the length bound the engine was built with.
    LengthMismatch,
    /// The word contains a byte that is not part of the automaton's alphabet.
    UnknownSymbol,
    /// The word is not accepted by the automaton.
    NotInLanguage,
}
impl std::error::Error for RankError {}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
/// Represents the error when an [`Engine`] unranks an index.
pub enum UnrankError {
    /// The index is at least the number of words of the requested length, or the length exceeds the bound the engine was built with.
    IndexOutOfRange,
}
impl std::error::Error for UnrankError {}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
/// Represents the error when an [`Engine`] counts a length window.
pub enum CountError {
    /// The range is inverted or extends past the length bound the engine was built with.
    BadRange,
}
impl std::error::Error for CountError {}

/// The engine that maps between the words of a regular language and a
/// contiguous range of non-negative integers.
///
/// For every length `n` up to the engine's length bound, the words of length
/// exactly `n` are enumerated in the lexicographic order induced by the
/// automaton's symbol-index order, and [`Engine::rank`] /
/// [`Engine::unrank`] convert between a word and its position in that
/// enumeration. The two operations are mutually inverse bijections between
/// the words of length `n` and the interval `[0, count(n, n))`.
///
/// All state is immutable after construction, so one engine can serve any
/// number of concurrent query threads; cloning shares the underlying tables.
///
/// Note that the bijection is a property of a particular automaton
/// serialisation, not of the language: building two engines from different
/// dumps of the same language may order symbols differently, so ranks must
/// never be compared across independently constructed engines.
#[derive(Debug, Clone)]
pub struct Engine {
    dfa: Arc<Dfa>,
}

impl Engine {
    /// Create a new [`Engine`] from a regex pattern and a length bound, with
    /// the default configuration.
    ///
    /// # Arguments
    ///
    /// * `pattern` - The regex pattern, interpreted with byte semantics as
    ///   described in [`att_fst_from_regex`](crate::regex::att_fst_from_regex).
    /// * `max_len` - The maximum word length to precompute the count table
    ///   for. Queries beyond this length are rejected.
    ///
    /// # Errors
    ///
    /// Returns a [`CreateEngineError`] when the pattern does not compile or
    /// the resulting automaton is degenerate. Check the error type docs for
    /// more details.
    pub fn new(pattern: &str, max_len: usize) -> Result<Engine, CreateEngineError> {
        Self::with_config(pattern, max_len, Config::default())
    }

    /// Create a new [`Engine`] from a regex pattern, a length bound and a
    /// [`Config`].
    ///
    /// # Errors
    ///
    /// Returns a [`CreateEngineError`] when the pattern does not compile
    /// within the configured memory budget or the resulting automaton is
    /// degenerate.
    pub fn with_config(
        pattern: &str,
        max_len: usize,
        config: Config,
    ) -> Result<Engine, CreateEngineError> {
        let dump = regex::att_fst_from_regex(pattern, &config.regex_config)?;
        Ok(Self {
            dfa: Arc::new(Dfa::new(&dump, max_len)?),
        })
    }

    /// Create a new [`Engine`] directly from an AT&T FST transition dump,
    /// skipping regex compilation. Useful when the automaton was minimised by
    /// external FST tooling.
    ///
    /// # Errors
    ///
    /// Returns a [`CreateEngineError`] when the dump is malformed.
    pub fn from_att_fst(dump: &str, max_len: usize) -> Result<Engine, CreateEngineError> {
        Ok(Self {
            dfa: Arc::new(Dfa::new(dump, max_len)?),
        })
    }

    /// Compute the rank of a word: its position in the lexicographic
    /// enumeration of all accepted words of length exactly `word.len()`.
    ///
    /// Walking the automaton, each step adds the number of accepted words
    /// that share the prefix consumed so far but continue with a smaller
    /// symbol. When every outgoing transition of the current state leads to
    /// the same successor, that sum collapses into a single multiplication.
    ///
    /// # Returns
    ///
    /// * `BigUint` - The rank, in `[0, count(n, n))` for `n = word.len()`.
    ///
    /// # Errors
    ///
    /// Returns a [`RankError`] when the word is longer than the length
    /// bound, contains a byte outside the alphabet, or is not accepted by
    /// the automaton. The engine is unchanged in this case.
    pub fn rank(&self, word: &[u8]) -> Result<BigUint, RankError> {
        let n = word.len();
        if n > self.dfa.max_len() {
            return Err(RankError::LengthMismatch);
        }
        let mut rank = BigUint::zero();
        let mut state = self.dfa.start_state();
        for (pos, &byte) in word.iter().enumerate() {
            let symbol = self.dfa.symbol_index(byte).ok_or(RankError::UnknownSymbol)?;
            let remaining = n - pos - 1;
            if self.dfa.is_dense(state) {
                let next = self.dfa.next_state(state, 0);
                rank += self.dfa.word_count(next, remaining) * symbol;
            } else {
                for smaller in 0..symbol {
                    let next = self.dfa.next_state(state, smaller);
                    rank += self.dfa.word_count(next, remaining);
                }
            }
            state = self.dfa.next_state(state, symbol);
        }
        if !self.dfa.is_final(state) {
            return Err(RankError::NotInLanguage);
        }
        Ok(rank)
    }

    /// Compute the word of length `word_len` whose rank is `index`: the
    /// inverse of [`Engine::rank`].
    ///
    /// # Returns
    ///
    /// * `Vec<u8>` - The word, satisfying
    ///   `rank(&unrank(index, n)?)? == index` for every `index` in
    ///   `[0, count(n, n))`.
    ///
    /// # Errors
    ///
    /// Returns an [`UnrankError`] when `word_len` exceeds the length bound
    /// or `index` is not smaller than the number of accepted words of that
    /// length.
    pub fn unrank(&self, index: &BigUint, word_len: usize) -> Result<Vec<u8>, UnrankError> {
        if word_len > self.dfa.max_len() {
            return Err(UnrankError::IndexOutOfRange);
        }
        let mut state = self.dfa.start_state();
        if index >= self.dfa.word_count(state, word_len) {
            return Err(UnrankError::IndexOutOfRange);
        }
        let alphabet_len = self.dfa.alphabet_len() as u32;
        let mut rest = index.clone();
        let mut word = Vec::with_capacity(word_len);
        for pos in 0..word_len {
            let remaining = word_len - pos - 1;
            if self.dfa.is_dense(state) {
                let next = self.dfa.next_state(state, 0);
                let count = self.dfa.word_count(next, remaining);
                if !count.is_zero() {
                    let (symbol, carry) = rest.div_rem(count);
                    let symbol = symbol.to_u32().ok_or(UnrankError::IndexOutOfRange)?;
                    if symbol >= alphabet_len {
                        return Err(UnrankError::IndexOutOfRange);
                    }
                    word.push(self.dfa.symbol(symbol));
                    rest = carry;
                } else {
                    word.push(self.dfa.symbol(0));
                }
                state = next;
            } else {
                let mut symbol = 0;
                let mut next = self.dfa.next_state(state, symbol);
                while &rest >= self.dfa.word_count(next, remaining) {
                    rest -= self.dfa.word_count(next, remaining);
                    symbol += 1;
                    if symbol >= alphabet_len {
                        return Err(UnrankError::IndexOutOfRange);
                    }
                    next = self.dfa.next_state(state, symbol);
                }
                word.push(self.dfa.symbol(symbol));
                state = next;
            }
        }
        if !self.dfa.is_final(state) {
            return Err(UnrankError::IndexOutOfRange);
        }
        Ok(word)
    }

    /// Count the accepted words whose length lies in `[min_len, max_len]`,
    /// inclusive on both ends.
    ///
    /// # Errors
    ///
    /// Returns a [`CountError`] when `min_len > max_len` or `max_len`
    /// exceeds the length bound the engine was built with.
    pub fn count(&self, min_len: usize, max_len: usize) -> Result<BigUint, CountError> {
        if min_len > max_len || max_len > self.dfa.max_len() {
            return Err(CountError::BadRange);
        }
        let start = self.dfa.start_state();
        let mut total = BigUint::zero();
        for len in min_len..=max_len {
            total += self.dfa.word_count(start, len);
        }
        Ok(total)
    }

    /// Compute the rank of a word in the enumeration of *all* accepted words
    /// of length up to the engine's length bound, ordered by length first and
    /// lexicographically within a length.
    ///
    /// This is [`Engine::rank`] plus the number of accepted words strictly
    /// shorter than the input.
    ///
    /// # Errors
    ///
    /// Returns a [`RankError`] under the same conditions as [`Engine::rank`].
    pub fn rank_variable(&self, word: &[u8]) -> Result<BigUint, RankError> {
        let mut rank = self.rank(word)?;
        let start = self.dfa.start_state();
        for len in 0..word.len() {
            rank += self.dfa.word_count(start, len);
        }
        Ok(rank)
    }

    /// Compute the word whose [`Engine::rank_variable`] is `index`: the
    /// inverse of the length-first enumeration.
    ///
    /// The word length is recovered by peeling whole length classes off the
    /// index, then the fixed-length inverse does the rest.
    ///
    /// # Errors
    ///
    /// Returns an [`UnrankError`] when `index` is not smaller than the total
    /// number of accepted words of length up to the engine's length bound.
    pub fn unrank_variable(&self, index: &BigUint) -> Result<Vec<u8>, UnrankError> {
        let start = self.dfa.start_state();
        let mut rest = index.clone();
        let mut word_len = 0;
        loop {
            if word_len > self.dfa.max_len() {
                return Err(UnrankError::IndexOutOfRange);
            }
            let count = self.dfa.word_count(start, word_len);
            if &rest < count {
                break;
            }
            rest -= count;
            word_len += 1;
        }
        self.unrank(&rest, word_len)
    }

    #[inline]
    /// Get the maximum word length the engine precomputed its table for.
    pub fn max_len(&self) -> usize {
        self.dfa.max_len()
    }

    #[inline]
    /// Get the underlying automaton and its count table.
    pub fn dfa(&self) -> Arc<Dfa> {
        self.dfa.clone()
    }
}
