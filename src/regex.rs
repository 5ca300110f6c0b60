//! The regex compiler front-end that lowers a pattern into a DFA transition dump.
//!
//! The dump uses the AT&T FST text format: one `src\tdst\tinput\toutput` line
//! per transition and one `state` line per accepting state, all integers
//! decimal. It is the exchange format between this module and the
//! [`Dfa`](crate::dfa::Dfa) loader, and the same format external FST tooling
//! emits, so a pre-minimised automaton can be fed to the loader directly.
use std::collections::hash_map::Entry;

use ahash::AHashMap;
use regex_automata::dfa::dense;
use regex_automata::dfa::Automaton;
use regex_automata::dfa::StartError;
use regex_automata::dfa::StartKind;
use regex_automata::nfa::thompson;
use regex_automata::util::primitives::StateID;
use regex_automata::util::start;
use regex_automata::Anchored;

use crate::config::RegexConfig;

#[derive(Debug, thiserror::Error)]
/// The error type for errors in regex compilation.
pub enum CompileRegexError {
    #[error("regex parsing error: {0}")]
    /// The pattern is not a valid regular expression.
    BadRegex(#[from] Box<regex_syntax::Error>),
    #[error("regex exceeds the memory budget: {0}")]
    /// Error due to the Thompson NFA exceeding the configured memory budget.
    NfaTooLarge(#[from] Box<thompson::BuildError>),
    #[error("regex exceeds the memory budget: {0}")]
    /// Error due to determinization or minimization exceeding the configured memory budget.
    DfaTooLarge(#[from] Box<dense::BuildError>),
    #[error("regex initialization error: {0}")]
    /// Error when computing the anchored start state of the DFA.
    DfaStartError(#[from] StartError),
}

/// Compiles a pattern into a minimised DFA and serialises it as an AT&T FST
/// transition dump.
///
/// The pattern is interpreted with byte (Latin-1) semantics rather than
/// Unicode: `.` and negated classes match every byte including newline,
/// `^`/`$` match only at the string boundaries, and the Perl classes
/// (`\d`, `\w`, `\s`) and ASCII `\b` are available. The automaton matches
/// whole strings only.
///
/// States are renumbered densely in breadth-first discovery order, so the
/// start state is always `0`. Within a state, transitions are emitted in
/// ascending byte order; transitions into the sink are omitted. The symbol
/// order of the dump is what ultimately induces the lexicographic order
/// ranked by the [`Engine`](crate::engine::Engine), so two dumps of the same
/// language need not define the same bijection.
///
/// # Errors
///
/// Returns a [`CompileRegexError`] when the pattern is invalid or any
/// compilation stage exceeds `config.max_memory_usage`.
pub fn att_fst_from_regex(
    pattern: &str,
    config: &RegexConfig,
) -> Result<String, CompileRegexError> {
    let hir = regex_syntax::ParserBuilder::new()
        .unicode(false)
        .utf8(false)
        .multi_line(false)
        .dot_matches_new_line(true)
        .build()
        .parse(pattern)
        .map_err(Box::new)?;
    let nfa = thompson::Compiler::new()
        .configure(
            thompson::Config::new()
                .utf8(false)
                .nfa_size_limit(config.max_memory_usage),
        )
        .build_from_hir(&hir)
        .map_err(Box::new)?;
    let dfa = dense::Builder::new()
        .configure(
            dense::Config::new()
                .minimize(true)
                .accelerate(false)
                .start_kind(StartKind::Anchored)
                .dfa_size_limit(config.max_memory_usage)
                .determinize_size_limit(config.max_memory_usage),
        )
        .build_from_nfa(&nfa)
        .map_err(Box::new)?;
    dump_transitions(&dfa)
}

/// Walks the compiled DFA breadth-first and renders the reachable, live part
/// of it in the AT&T FST text format.
fn dump_transitions(dfa: &dense::DFA<Vec<u32>>) -> Result<String, CompileRegexError> {
    let start_id = dfa.start_state(&start::Config::new().anchored(Anchored::Yes))?;
    let mut state_ids: AHashMap<StateID, usize> = AHashMap::default();
    let mut order = vec![start_id];
    state_ids.insert(start_id, 0);
    let mut out = String::new();
    let mut cursor = 0;
    while cursor < order.len() {
        let state = order[cursor];
        for byte in 0..=u8::MAX {
            let next = dfa.next_state(state, byte);
            if dfa.is_dead_state(next) || dfa.is_quit_state(next) {
                continue;
            }
            let dst = match state_ids.entry(next) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let id = order.len();
                    entry.insert(id);
                    order.push(next);
                    id
                }
            };
            out.push_str(&format!("{}\t{}\t{}\t{}\n", cursor, dst, byte, byte));
        }
        cursor += 1;
    }
    for (id, &state) in order.iter().enumerate() {
        // A state accepts iff the end-of-input transition lands on a match state.
        if dfa.is_match_state(dfa.next_eoi_state(state)) {
            out.push_str(&format!("{}\n", id));
        }
    }
    Ok(out)
}
