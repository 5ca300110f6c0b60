//! The DFA module that parses a transition dump and precomputes the
//! word-count table driving rank and unrank.
use std::collections::hash_map::Entry;
use std::fmt::Debug;

use ahash::{AHashMap, AHashSet};
use fixedbitset_stack::FixedBitSet;
use jaggedarray::jagged_array::JaggedArray;
use jaggedarray::jagged_array::JaggedArrayViewTrait;
use num::BigUint;
use num::One;
use num::Zero;

#[derive(Debug, thiserror::Error)]
/// The error type for errors in [`Dfa`] creation.
pub enum CreateDfaError {
    #[error("malformed transition dump: {0:?} is neither a transition nor a final-state line")]
    /// A line is neither a 4-column transition nor a 1-column final-state declaration.
    InvalidLine(String),
    #[error("malformed transition dump: state {0} is not in the range 0..{1}")]
    /// The dump mentions N states and one of them is not in the range 0,1,...,N-1.
    StateOutOfRange(u32, u32),
    #[error("malformed transition dump: symbol {0} is not in the range 0..=255")]
    /// A transition consumes a symbol that is not a byte.
    SymbolOutOfRange(u32),
    #[error("malformed transition dump: no transitions were declared, so the automaton has no start state and no alphabet")]
    /// The dump contains no transition lines at all.
    NoTransitions,
}

/// One parsed line of a transition dump.
enum Line {
    Transition { src: u32, dst: u32, symbol: u32 },
    Final(u32),
}

fn parse_line(line: &str) -> Result<Line, CreateDfaError> {
    let invalid = || CreateDfaError::InvalidLine(line.to_string());
    let fields: Vec<&str> = line.split('\t').collect();
    match fields.as_slice() {
        // The 4th column is the transducer output label, which we ignore.
        [src, dst, symbol, _output] => Ok(Line::Transition {
            src: src.parse().map_err(|_| invalid())?,
            dst: dst.parse().map_err(|_| invalid())?,
            symbol: symbol.parse().map_err(|_| invalid())?,
        }),
        [state] => Ok(Line::Final(state.parse().map_err(|_| invalid())?)),
        _ => Err(invalid()),
    }
}

/// A deterministic finite automaton in dense-table form, together with the
/// precomputed table of word counts per state and length.
///
/// The automaton is loaded from an AT&T FST transition dump (see
/// [`att_fst_from_regex`](crate::regex::att_fst_from_regex)). States must be
/// labeled `0,1,...,N-1`; one extra sink state `N` is appended and every
/// (state, symbol) pair the dump leaves unspecified transitions into it.
/// Symbols are indexed in the order they first appear in the dump, and this
/// index order, not the numeric byte order, is the lexicographic order the
/// rank/unrank bijection enumerates.
///
/// `word_count(q, i)` is the number of strings of length exactly `i` that
/// drive the automaton from state `q` into an accepting state. The table is
/// built once for every length up to `max_len` with exact big-integer
/// arithmetic, then the whole structure is immutable.
#[derive(Clone)]
pub struct Dfa {
    max_len: usize,
    start_state: u32,
    sigma: Vec<u8>,
    sigma_reverse: AHashMap<u8, u32>,
    delta: JaggedArray<u32, Vec<usize>, 2>,
    dense_rows: FixedBitSet,
    final_states: FixedBitSet,
    table: JaggedArray<BigUint, Vec<usize>, 2>,
}

impl Dfa {
    /// Parses a transition dump and builds the word-count table for every
    /// length up to `max_len`.
    ///
    /// Parsing stops at the first blank line. The first source state of the
    /// dump becomes the start state. Table construction costs
    /// `O(states * symbols * max_len)` big-integer additions.
    ///
    /// # Errors
    ///
    /// Returns a [`CreateDfaError`] when the dump cannot be parsed, mentions
    /// a state or symbol out of range, or declares no transitions at all.
    pub fn new(dump: &str, max_len: usize) -> Result<Self, CreateDfaError> {
        // Discovery pass: source states in order of first mention, symbols in
        // order of first appearance, accepting states.
        let mut states: Vec<u32> = Vec::new();
        let mut seen_states: AHashSet<u32> = AHashSet::default();
        let mut sigma: Vec<u8> = Vec::new();
        let mut sigma_reverse: AHashMap<u8, u32> = AHashMap::default();
        let mut final_ids: Vec<u32> = Vec::new();
        let mut start_state: Option<u32> = None;
        for line in dump.lines() {
            if line.is_empty() {
                break;
            }
            match parse_line(line)? {
                Line::Transition { src, symbol, .. } => {
                    if seen_states.insert(src) {
                        states.push(src);
                    }
                    let byte = u8::try_from(symbol)
                        .map_err(|_| CreateDfaError::SymbolOutOfRange(symbol))?;
                    if let Entry::Vacant(entry) = sigma_reverse.entry(byte) {
                        entry.insert(sigma.len() as u32);
                        sigma.push(byte);
                    }
                    if start_state.is_none() {
                        start_state = Some(src);
                    }
                }
                Line::Final(state) => {
                    if seen_states.insert(state) {
                        states.push(state);
                    }
                    final_ids.push(state);
                }
            }
        }
        let start_state = start_state.ok_or(CreateDfaError::NoTransitions)?;
        let real_states = states.len() as u32;
        for &state in &states {
            if state >= real_states {
                return Err(CreateDfaError::StateOutOfRange(state, real_states));
            }
        }
        // One extra state for the sink every unspecified transition falls into.
        let dead_state = real_states;
        let num_states = real_states as usize + 1;
        let num_symbols = sigma.len();

        let mut final_states = FixedBitSet::with_capacity(num_states);
        for state in final_ids {
            final_states.insert(state as usize);
        }

        // Population pass.
        let mut rows = vec![vec![dead_state; num_symbols]; num_states];
        for line in dump.lines() {
            if line.is_empty() {
                break;
            }
            if let Line::Transition { src, dst, symbol } = parse_line(line)? {
                if dst >= num_states as u32 {
                    return Err(CreateDfaError::StateOutOfRange(dst, num_states as u32));
                }
                let index = sigma_reverse[&(symbol as u8)];
                rows[src as usize][index as usize] = dst;
            }
        }

        let mut dense_rows = FixedBitSet::with_capacity(num_states);
        for (state, row) in rows.iter().enumerate() {
            if row.iter().all(|&next| next == row[0]) {
                dense_rows.insert(state);
            }
        }

        // word_count(q, i) for i = 0: only the empty string, only from an
        // accepting state. Each further row follows from the previous one by
        // summing over the outgoing transitions.
        let mut table = JaggedArray::<BigUint, Vec<usize>, 2>::new();
        table.new_row::<0>();
        for state in 0..num_states {
            table.push_to_last_row(if final_states.contains(state) {
                BigUint::one()
            } else {
                BigUint::zero()
            });
        }
        for len in 1..=max_len {
            let mut row = vec![BigUint::zero(); num_states];
            {
                let view = table.view([len - 1]);
                let prev = view.as_slice();
                for (state, count) in row.iter_mut().enumerate() {
                    for &next in &rows[state] {
                        *count += &prev[next as usize];
                    }
                }
            }
            table.new_row::<0>();
            for count in row {
                table.push_to_last_row(count);
            }
        }

        let mut delta = JaggedArray::<u32, Vec<usize>, 2>::new();
        for row in &rows {
            delta.new_row::<0>();
            delta.extend_last_row_from_slice(row);
        }

        let dfa = Self {
            max_len,
            start_state,
            sigma,
            sigma_reverse,
            delta,
            dense_rows,
            final_states,
            table,
        };
        if (0..=max_len).all(|len| dfa.word_count(dfa.start_state, len).is_zero()) {
            log::warn!(
                "The automaton accepts no string of length at most {}. \
                Every rank, unrank and count query on this table will come up empty. \
                This usually means the length bound is smaller than the shortest word \
                of the language, or the pattern matches nothing at all.",
                max_len
            );
        }
        Ok(dfa)
    }

    #[inline]
    /// Get the start state.
    pub fn start_state(&self) -> u32 {
        self.start_state
    }

    #[inline]
    /// Get the maximum length the word-count table was built for.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    #[inline]
    /// Get the number of states, including the appended sink state.
    pub fn state_len(&self) -> usize {
        self.delta.len()
    }

    #[inline]
    /// Get the number of distinct symbols in the alphabet.
    pub fn alphabet_len(&self) -> usize {
        self.sigma.len()
    }

    #[inline]
    /// Get the alphabet bytes in symbol-index order.
    pub fn alphabet(&self) -> &[u8] {
        &self.sigma
    }

    #[inline]
    /// Check whether the given state is accepting.
    pub fn is_final(&self, state: u32) -> bool {
        self.final_states.contains(state as usize)
    }

    #[inline]
    /// Check whether every outgoing transition of the given state leads to
    /// the same successor.
    pub fn is_dense(&self, state: u32) -> bool {
        self.dense_rows.contains(state as usize)
    }

    #[inline]
    /// Get the byte for a symbol index.
    ///
    /// # Panics
    ///
    /// Panics if the symbol index is out of bounds.
    pub fn symbol(&self, index: u32) -> u8 {
        self.sigma[index as usize]
    }

    #[inline]
    /// Get the symbol index for a byte, or `None` if the byte is not part of
    /// the alphabet.
    pub fn symbol_index(&self, byte: u8) -> Option<u32> {
        self.sigma_reverse.get(&byte).copied()
    }

    #[inline]
    /// Get the successor of `state` on the symbol with index `symbol_index`.
    ///
    /// # Panics
    ///
    /// Panics if the state or symbol index is out of bounds.
    pub fn next_state(&self, state: u32, symbol_index: u32) -> u32 {
        self.delta.view([state as usize]).as_slice()[symbol_index as usize]
    }

    #[inline]
    /// Get the number of strings of length exactly `len` that drive the
    /// automaton from `state` into an accepting state.
    ///
    /// # Panics
    ///
    /// Panics if the state is out of bounds or `len` exceeds the maximum
    /// length the table was built for.
    pub fn word_count(&self, state: u32, len: usize) -> &BigUint {
        &self.table.view([len]).as_slice()[state as usize]
    }
}

impl Debug for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dfa")
            .field("states", &self.state_len())
            .field("alphabet", &display_alphabet(&self.sigma))
            .field("start_state", &self.start_state)
            .field("final_states", &self.final_states.ones().collect::<Vec<_>>())
            .field("dense_rows", &self.dense_rows.count_ones(..))
            .field("max_len", &self.max_len)
            .finish()
    }
}

fn display_alphabet(sigma: &[u8]) -> String {
    sigma
        .iter()
        .map(|&byte| {
            if byte.is_ascii_graphic() {
                (byte as char).to_string()
            } else {
                format!("\\x{:02x}", byte)
            }
        })
        .collect()
}
